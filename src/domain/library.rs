//! View path sources and the libraries (engines) that contribute them.
//!
//! A host application may be assembled from several libraries, each owning a
//! slice of the controller namespace (`Webhooks::OutboundController` belongs
//! to the `WebhooksEngine`). A library takes part in view resolution only when
//! it can map `(action, controller)` to a view path; [`LibraryDescriptor`]
//! wraps such a handle together with the short name used to claim
//! controllers.

use std::fmt;
use std::sync::Arc;

use super::error::DomainError;
use super::naming::{SCOPE_SEPARATOR, join_scopes, strip_type_suffix};

const LIBRARY_SUFFIXES: [&str; 2] = ["Engine", "Railtie"];
const CONTROLLER_SUFFIX: &str = "Controller";

/// Anything able to name the view class for an action of a controller.
///
/// Both arguments are canonical class paths. Returning `None` (or a blank
/// string) means the source has no opinion for this pair.
pub trait ViewPathSource: Send + Sync {
    fn view_path(&self, action: &str, controller: &str) -> Option<String>;
}

impl<F> ViewPathSource for F
where
    F: Fn(&str, &str) -> Option<String> + Send + Sync,
{
    fn view_path(&self, action: &str, controller: &str) -> Option<String> {
        self(action, controller)
    }
}

/// Maps `(action, controller)` to `{namespace}::{controller}::{action}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalViews {
    namespace: String,
}

impl ConventionalViews {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl ViewPathSource for ConventionalViews {
    fn view_path(&self, action: &str, controller: &str) -> Option<String> {
        Some(join_scopes([self.namespace.as_str(), controller, action]))
    }
}

/// Raw handle for an installed library, as the host registers it.
#[derive(Clone)]
pub struct LibraryHandle {
    name: String,
    views: Option<Arc<dyn ViewPathSource>>,
}

impl LibraryHandle {
    /// A library without view support; resolvers skip it.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            views: None,
        }
    }

    pub fn with_views(name: impl Into<String>, views: impl ViewPathSource + 'static) -> Self {
        Self {
            name: name.into(),
            views: Some(Arc::new(views)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn exposes_view_path(&self) -> bool {
        self.views.is_some()
    }

    pub fn view_path(&self, action: &str, controller: &str) -> Option<String> {
        self.views
            .as_ref()
            .and_then(|views| views.view_path(action, controller))
    }
}

impl fmt::Debug for LibraryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibraryHandle")
            .field("name", &self.name)
            .field("exposes_view_path", &self.exposes_view_path())
            .finish()
    }
}

/// A library registered with a resolver.
#[derive(Debug, Clone)]
pub struct LibraryDescriptor {
    handle: LibraryHandle,
    short_name: String,
}

impl LibraryDescriptor {
    /// Wrap a handle, deriving its short name.
    ///
    /// Fails when the handle cannot take part in resolution: it has no view
    /// path capability, or its name reduces to nothing once the library
    /// suffix is stripped.
    pub fn new(handle: LibraryHandle) -> Result<Self, DomainError> {
        if !handle.exposes_view_path() {
            return Err(DomainError::malformed_library(
                handle.name(),
                "library does not expose a view path",
            ));
        }

        let short_name = derive_short_name(handle.name());
        if short_name.is_empty() {
            return Err(DomainError::malformed_library(
                handle.name(),
                "library name is blank once its suffix is removed",
            ));
        }

        Ok(Self { handle, short_name })
    }

    pub fn handle(&self) -> &LibraryHandle {
        &self.handle
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// True when the canonical controller lives in this library's scope.
    pub fn matches(&self, controller: &str) -> bool {
        controller
            .strip_prefix(self.short_name.as_str())
            .is_some_and(|rest| rest.starts_with(SCOPE_SEPARATOR))
    }

    /// Controller name relative to this library, without the `Controller` suffix.
    pub fn scope_name(&self, controller: &str) -> String {
        let scoped = controller
            .strip_prefix(self.short_name.as_str())
            .and_then(|rest| rest.strip_prefix(SCOPE_SEPARATOR))
            .unwrap_or(controller);
        scoped
            .strip_suffix(CONTROLLER_SUFFIX)
            .unwrap_or(scoped)
            .to_string()
    }

    pub fn view_path(&self, action: &str, scope_name: &str) -> Option<String> {
        self.handle.view_path(action, scope_name)
    }
}

fn derive_short_name(name: &str) -> String {
    let name = name.trim();
    LIBRARY_SUFFIXES
        .iter()
        .find_map(|suffix| strip_type_suffix(name, suffix))
        .unwrap_or(name)
        .to_string()
}
