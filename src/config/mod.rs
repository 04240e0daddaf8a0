//! Configuration layer: typed settings with layered precedence (file → env → CLI).

mod cli;

use std::{str::FromStr, sync::Arc};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::application::dispatch::{Layout, RenderOptions};
use crate::application::registry::ClassRegistry;
use crate::application::resolver::{ApplicationRoot, ModuleTable, ViewResolver, ViewResolverBuilder};
use crate::domain::component::ComponentNamespace;
use crate::domain::library::{ConventionalViews, LibraryHandle};

pub use cli::{CanonicalizeArgs, CliArgs, Command, Overrides, PathsArgs, RenderArgs, SplitArgs};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "viewkit";
const ENV_PREFIX: &str = "VIEWKIT";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub views: ViewSettings,
    pub application: ApplicationSettings,
    pub libraries: Vec<LibrarySettings>,
    pub modules: Vec<ModuleSettings>,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub components_namespace: Option<ComponentNamespace>,
    /// Recover from missing views by rendering the missing-view page.
    pub missing_view: bool,
    pub default_layout: Option<String>,
}

impl ViewSettings {
    /// Base options for every render: the configured default layout, if any.
    pub fn render_options(&self) -> RenderOptions {
        match self.default_layout.as_ref() {
            Some(layout) => RenderOptions::new().layout(Layout::Named(layout.clone())),
            None => RenderOptions::new(),
        }
    }
}

/// How the host application maps its own views.
#[derive(Debug, Clone, Default)]
pub struct ApplicationSettings {
    /// Type name of the application object (`Blog::Application`).
    pub type_name: Option<String>,
    /// Namespace the application keeps its views in (`View`).
    pub view_namespace: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySettings {
    pub name: String,
    pub view_namespace: Option<String>,
}

/// A named module exposing views, used to re-root a plain application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSettings {
    pub name: String,
    pub view_namespace: String,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            views,
            application,
            libraries,
            modules,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            views: build_view_settings(views),
            application: build_application_settings(application),
            libraries: build_library_settings(libraries)?,
            modules: build_module_settings(modules)?,
        })
    }

    /// The application root these settings describe, if any.
    pub fn application_root(&self) -> Option<ApplicationRoot> {
        if let Some(namespace) = self.application.view_namespace.as_ref() {
            return Some(ApplicationRoot::direct(ConventionalViews::new(
                namespace.clone(),
            )));
        }
        self.application
            .type_name
            .as_ref()
            .map(|type_name| ApplicationRoot::plain(type_name.clone()))
    }

    pub fn library_handles(&self) -> Vec<LibraryHandle> {
        self.libraries
            .iter()
            .map(|library| match library.view_namespace.as_ref() {
                Some(namespace) => LibraryHandle::with_views(
                    library.name.clone(),
                    ConventionalViews::new(namespace.clone()),
                ),
                None => LibraryHandle::new(library.name.clone()),
            })
            .collect()
    }

    pub fn module_table(&self) -> ModuleTable {
        self.modules
            .iter()
            .fold(ModuleTable::new(), |table, module| {
                table.with(
                    &module.name,
                    ConventionalViews::new(module.view_namespace.clone()),
                )
            })
    }

    /// A resolver builder preloaded with everything these settings describe.
    pub fn resolver_builder(&self, registry: Arc<dyn ClassRegistry>) -> ViewResolverBuilder {
        let mut builder = ViewResolver::builder(registry)
            .libraries(self.library_handles())
            .components_namespace(self.views.components_namespace.clone())
            .modules(self.module_table());
        if let Some(root) = self.application_root() {
            builder = builder.application(root);
        }
        builder
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    views: RawViewSettings,
    application: RawApplicationSettings,
    libraries: Vec<RawLibrarySettings>,
    modules: Vec<RawModuleSettings>,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(namespace) = overrides.components_namespace.as_ref() {
            self.views.components_namespace = Some(namespace.clone());
        }
        if let Some(namespace) = overrides.application_view_namespace.as_ref() {
            self.application.view_namespace = Some(namespace.clone());
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawViewSettings {
    components_namespace: Option<String>,
    missing_view: Option<bool>,
    default_layout: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApplicationSettings {
    type_name: Option<String>,
    view_namespace: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLibrarySettings {
    name: Option<String>,
    view_namespace: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawModuleSettings {
    name: Option<String>,
    view_namespace: Option<String>,
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_view_settings(views: RawViewSettings) -> ViewSettings {
    ViewSettings {
        components_namespace: views.components_namespace.and_then(ComponentNamespace::new),
        missing_view: views.missing_view.unwrap_or(true),
        default_layout: non_blank(views.default_layout),
    }
}

fn build_application_settings(application: RawApplicationSettings) -> ApplicationSettings {
    ApplicationSettings {
        type_name: non_blank(application.type_name),
        view_namespace: non_blank(application.view_namespace),
    }
}

fn build_library_settings(
    libraries: Vec<RawLibrarySettings>,
) -> Result<Vec<LibrarySettings>, LoadError> {
    libraries
        .into_iter()
        .enumerate()
        .map(|(index, library)| {
            let name = non_blank(library.name).ok_or_else(|| {
                LoadError::invalid("libraries.name", format!("library #{index} has no name"))
            })?;
            Ok(LibrarySettings {
                name,
                view_namespace: non_blank(library.view_namespace),
            })
        })
        .collect()
}

fn build_module_settings(modules: Vec<RawModuleSettings>) -> Result<Vec<ModuleSettings>, LoadError> {
    modules
        .into_iter()
        .enumerate()
        .map(|(index, module)| {
            let name = non_blank(module.name).ok_or_else(|| {
                LoadError::invalid("modules.name", format!("module #{index} has no name"))
            })?;
            let view_namespace = non_blank(module.view_namespace).ok_or_else(|| {
                LoadError::invalid(
                    "modules.view_namespace",
                    format!("module `{name}` has no view namespace"),
                )
            })?;
            Ok(ModuleSettings {
                name,
                view_namespace,
            })
        })
        .collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
