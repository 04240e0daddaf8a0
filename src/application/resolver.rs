//! View resolution: from `(action, controller)` to a component class.
//!
//! For every lookup the resolver builds an ordered list of candidate class
//! paths and probes them against the [`ClassRegistry`]:
//!
//! 1. the application's own `view_path`,
//! 2. the `view_path` of the library owning the controller,
//! 3. `{components}::Views::{controller}::{action}` in the shared components
//!    namespace,
//! 4. the legacy page `View::Pages::{scope}::{action}Page`, prefixed with the
//!    owning library's short name.
//!
//! The first candidate that resolves wins and is cached under
//! `{controller}::{action}`. Misses are never cached, so a class registered
//! later is found without clearing the cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use metrics::counter;
use tracing::{debug, trace};

use crate::domain::component::{ComponentNamespace, ComponentRef};
use crate::domain::error::DomainError;
use crate::domain::library::{LibraryDescriptor, LibraryHandle, ViewPathSource};
use crate::domain::naming::{SCOPE_SEPARATOR, canonicalize, join_scopes, strip_type_suffix};

use super::registry::ClassRegistry;

const APPLICATION_SUFFIX: &str = "Application";
const LEGACY_PAGES_SCOPE: &str = "View::Pages";
const LEGACY_PAGE_SUFFIX: &str = "Page";
const SHARED_VIEWS_SCOPE: &str = "Views";

pub(crate) const METRIC_CACHE_HIT: &str = "viewkit_resolver_cache_hit_total";
pub(crate) const METRIC_CACHE_MISS: &str = "viewkit_resolver_cache_miss_total";
pub(crate) const METRIC_NOT_FOUND: &str = "viewkit_resolver_not_found_total";

/// The host application as handed to the resolver.
#[derive(Clone)]
pub enum ApplicationRoot {
    /// The application maps views itself.
    Direct(Arc<dyn ViewPathSource>),
    /// An application object without view mapping. Its type name
    /// (`Blog::Application`) may point at a module (`Blog`) that has one.
    Plain { type_name: String },
}

impl ApplicationRoot {
    pub fn direct(views: impl ViewPathSource + 'static) -> Self {
        Self::Direct(Arc::new(views))
    }

    pub fn plain(type_name: impl Into<String>) -> Self {
        Self::Plain {
            type_name: type_name.into(),
        }
    }
}

impl fmt::Debug for ApplicationRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationRoot::Direct(_) => f.write_str("ApplicationRoot::Direct"),
            ApplicationRoot::Plain { type_name } => f
                .debug_struct("ApplicationRoot::Plain")
                .field("type_name", type_name)
                .finish(),
        }
    }
}

/// Named modules that expose a `view_path`, keyed by canonical name.
#[derive(Clone, Default)]
pub struct ModuleTable {
    modules: HashMap<String, Arc<dyn ViewPathSource>>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, views: impl ViewPathSource + 'static) {
        self.modules.insert(canonicalize(name), Arc::new(views));
    }

    pub fn with(mut self, name: &str, views: impl ViewPathSource + 'static) -> Self {
        self.insert(name, views);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ViewPathSource>> {
        self.modules.get(&canonicalize(name)).cloned()
    }
}

pub struct ViewResolverBuilder {
    registry: Arc<dyn ClassRegistry>,
    application: Option<ApplicationRoot>,
    libraries: Vec<LibraryHandle>,
    components_namespace: Option<ComponentNamespace>,
    modules: ModuleTable,
}

impl ViewResolverBuilder {
    pub fn application(mut self, application: ApplicationRoot) -> Self {
        self.application = Some(application);
        self
    }

    pub fn library(mut self, library: LibraryHandle) -> Self {
        self.libraries.push(library);
        self
    }

    pub fn libraries<I>(mut self, libraries: I) -> Self
    where
        I: IntoIterator<Item = LibraryHandle>,
    {
        self.libraries.extend(libraries);
        self
    }

    pub fn components_namespace(mut self, namespace: Option<ComponentNamespace>) -> Self {
        self.components_namespace = namespace;
        self
    }

    pub fn modules(mut self, modules: ModuleTable) -> Self {
        self.modules = modules;
        self
    }

    /// Validate libraries and settle the application root.
    ///
    /// Libraries without a view path are skipped, unless they have no name
    /// either, which is a configuration error.
    pub fn build(self) -> Result<ViewResolver, DomainError> {
        let mut libraries = Vec::with_capacity(self.libraries.len());
        for handle in self.libraries {
            if !handle.exposes_view_path() {
                if handle.name().trim().is_empty() {
                    return Err(DomainError::malformed_library(
                        handle.name(),
                        "library has neither a name nor a view path",
                    ));
                }
                debug!(library = handle.name(), "Skipping library without view path");
                continue;
            }
            libraries.push(LibraryDescriptor::new(handle)?);
        }

        let application = self
            .application
            .and_then(|root| settle_application(root, &self.modules));

        Ok(ViewResolver {
            application,
            libraries,
            components_namespace: self.components_namespace,
            registry: self.registry,
            cache: DashMap::new(),
        })
    }
}

fn settle_application(
    root: ApplicationRoot,
    modules: &ModuleTable,
) -> Option<Arc<dyn ViewPathSource>> {
    match root {
        ApplicationRoot::Direct(views) => Some(views),
        ApplicationRoot::Plain { type_name } => {
            let module_name = strip_type_suffix(type_name.trim(), APPLICATION_SUFFIX)?;
            if module_name.is_empty() {
                return None;
            }
            let module = modules.get(module_name);
            debug!(
                application = %type_name,
                module = module_name,
                found = module.is_some(),
                "Re-rooting application to its module"
            );
            module
        }
    }
}

pub struct ViewResolver {
    application: Option<Arc<dyn ViewPathSource>>,
    libraries: Vec<LibraryDescriptor>,
    components_namespace: Option<ComponentNamespace>,
    registry: Arc<dyn ClassRegistry>,
    cache: DashMap<String, ComponentRef>,
}

impl ViewResolver {
    pub fn builder(registry: Arc<dyn ClassRegistry>) -> ViewResolverBuilder {
        ViewResolverBuilder {
            registry,
            application: None,
            libraries: Vec::new(),
            components_namespace: None,
            modules: ModuleTable::new(),
        }
    }

    /// Component class for `(action, controller)`, if any candidate resolves.
    pub fn resolve(&self, action: &str, controller: &str) -> Option<ComponentRef> {
        let action = canonicalize(action);
        let controller = canonicalize(controller);
        let key = cache_key(&controller, &action);

        if let Some(hit) = self.cache.get(&key) {
            counter!(METRIC_CACHE_HIT).increment(1);
            trace!(key = %key, path = hit.path(), "View resolution cache hit");
            return Some(Arc::clone(hit.value()));
        }
        counter!(METRIC_CACHE_MISS).increment(1);

        let found = self
            .paths_for(&action, &controller)
            .into_iter()
            .find_map(|path| self.probe(&path));

        match found {
            Some(component) => {
                debug!(key = %key, path = component.path(), "Resolved view component");
                self.cache.insert(key, Arc::clone(&component));
                Some(component)
            }
            None => {
                counter!(METRIC_NOT_FOUND).increment(1);
                debug!(key = %key, "No view component resolved");
                None
            }
        }
    }

    /// Ordered candidate class paths for `(action, controller)`.
    pub fn candidate_paths(&self, action: &str, controller: &str) -> Vec<String> {
        self.paths_for(&canonicalize(action), &canonicalize(controller))
    }

    /// Same as [`Self::candidate_paths`]; shown on missing-view pages.
    pub fn view_paths(&self, action: &str, controller: &str) -> Vec<String> {
        self.candidate_paths(action, controller)
    }

    /// Owning library of `controller` and the controller's name inside it.
    pub fn split_controller(&self, controller: &str) -> (Option<&LibraryDescriptor>, String) {
        let controller = canonicalize(controller);
        self.split_canonical(&controller)
    }

    /// Drop every cached resolution.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Registered library handles, in registration order.
    pub fn libraries(&self) -> Vec<&LibraryHandle> {
        self.libraries
            .iter()
            .map(LibraryDescriptor::handle)
            .collect()
    }

    pub fn components_namespace(&self) -> Option<&ComponentNamespace> {
        self.components_namespace.as_ref()
    }

    pub fn registry(&self) -> &Arc<dyn ClassRegistry> {
        &self.registry
    }

    /// Number of cached resolutions.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn split_canonical(&self, controller: &str) -> (Option<&LibraryDescriptor>, String) {
        match self
            .libraries
            .iter()
            .find(|library| library.matches(controller))
        {
            Some(library) => (Some(library), library.scope_name(controller)),
            None => (None, controller.to_string()),
        }
    }

    fn paths_for(&self, action: &str, controller: &str) -> Vec<String> {
        let (library, scope_name) = self.split_canonical(controller);

        let application_path = self
            .application
            .as_ref()
            .and_then(|views| views.view_path(action, controller));

        let library_path = library.and_then(|library| library.view_path(action, &scope_name));

        let shared_path = self.components_namespace.as_ref().map(|namespace| {
            join_scopes([
                namespace.name(),
                SHARED_VIEWS_SCOPE,
                controller,
                action,
            ])
        });

        let legacy_page = format!("{action}{LEGACY_PAGE_SUFFIX}");
        let legacy_path = join_scopes([
            library.map_or("", LibraryDescriptor::short_name),
            LEGACY_PAGES_SCOPE,
            scope_name.as_str(),
            legacy_page.as_str(),
        ]);

        [application_path, library_path, shared_path, Some(legacy_path)]
            .into_iter()
            .flatten()
            .filter(|path| !path.trim().is_empty())
            .collect()
    }

    fn probe(&self, path: &str) -> Option<ComponentRef> {
        let exists = self.registry.class_exists(path);
        trace!(path, exists, "Probed view candidate");
        if exists {
            self.registry.resolve_class(path)
        } else {
            None
        }
    }
}

impl fmt::Debug for ViewResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewResolver")
            .field("has_application", &self.application.is_some())
            .field("libraries", &self.libraries)
            .field("components_namespace", &self.components_namespace)
            .field("cached", &self.cache.len())
            .finish()
    }
}

fn cache_key(controller: &str, action: &str) -> String {
    format!("{controller}{SCOPE_SEPARATOR}{action}")
}
