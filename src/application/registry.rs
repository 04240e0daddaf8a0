//! Component class registry.
//!
//! Resolution never reflects over live types. Every component class that can
//! be rendered is registered up front under its class path, and resolvers
//! probe this table instead.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::domain::component::ComponentRef;

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "application::registry";

/// Existence probe and lookup for component classes by class path.
///
/// `class_exists` must not fail on unknown paths; an undefined name is simply
/// `false`.
pub trait ClassRegistry: Send + Sync {
    fn class_exists(&self, path: &str) -> bool;

    fn resolve_class(&self, path: &str) -> Option<ComponentRef>;
}

/// In-memory [`ClassRegistry`] populated at startup.
pub struct ComponentRegistry {
    classes: RwLock<HashMap<String, ComponentRef>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self {
            classes: RwLock::new(HashMap::new()),
        }
    }

    /// Register a class under its own path, returning any class it replaced.
    pub fn register(&self, class: ComponentRef) -> Option<ComponentRef> {
        let path = class.path().to_string();
        debug!(path = %path, shape = ?class.shape(), "Registering component class");
        rw_write(&self.classes, SOURCE, "register").insert(path, class)
    }

    pub fn unregister(&self, path: &str) -> Option<ComponentRef> {
        rw_write(&self.classes, SOURCE, "unregister").remove(path)
    }

    /// Registered class paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = rw_read(&self.classes, SOURCE, "paths")
            .keys()
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    pub fn len(&self) -> usize {
        rw_read(&self.classes, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassRegistry for ComponentRegistry {
    fn class_exists(&self, path: &str) -> bool {
        rw_read(&self.classes, SOURCE, "class_exists").contains_key(path)
    }

    fn resolve_class(&self, path: &str) -> Option<ComponentRef> {
        rw_read(&self.classes, SOURCE, "resolve_class")
            .get(path)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::Arc;

    use super::*;
    use crate::domain::component::{ComponentClassFn, ConstructorShape};
    use crate::domain::error::DomainError;

    fn class(path: &str) -> ComponentRef {
        let owned = path.to_string();
        ComponentClassFn::new(path, ConstructorShape::Positional, move |_| {
            Err(DomainError::invalid_arguments(owned.clone(), "not constructible"))
        })
        .into_ref()
    }

    #[test]
    fn register_and_resolve() {
        let registry = ComponentRegistry::new();
        let books = class("View::Books::Publish");

        assert!(registry.register(Arc::clone(&books)).is_none());

        assert!(registry.class_exists("View::Books::Publish"));
        let resolved = registry
            .resolve_class("View::Books::Publish")
            .expect("registered class");
        assert!(Arc::ptr_eq(&resolved, &books));
    }

    #[test]
    fn unknown_paths_are_absent_not_errors() {
        let registry = ComponentRegistry::new();
        assert!(!registry.class_exists("View::Nope"));
        assert!(!registry.class_exists(""));
        assert!(registry.resolve_class("View::Nope").is_none());
    }

    #[test]
    fn register_replaces_existing_definition() {
        let registry = ComponentRegistry::new();
        let first = class("View::Books::Show");
        let second = class("View::Books::Show");

        registry.register(Arc::clone(&first));
        let replaced = registry.register(Arc::clone(&second)).expect("replaced");

        assert!(Arc::ptr_eq(&replaced, &first));
        let current = registry.resolve_class("View::Books::Show").expect("class");
        assert!(Arc::ptr_eq(&current, &second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregister_removes_class() {
        let registry = ComponentRegistry::new();
        registry.register(class("View::Books::Show"));
        registry.register(class("View::Authors::Show"));

        assert!(registry.unregister("View::Books::Show").is_some());
        assert_eq!(registry.paths(), vec!["View::Authors::Show".to_string()]);
        assert!(registry.unregister("View::Books::Show").is_none());
    }

    #[test]
    fn registry_recovers_from_poisoned_lock() {
        let registry = ComponentRegistry::new();

        let _ = catch_unwind(AssertUnwindSafe(|| {
            let _guard = registry
                .classes
                .write()
                .expect("classes lock should be acquired");
            panic!("poison classes lock");
        }));

        registry.register(class("View::Books::Show"));
        assert!(registry.class_exists("View::Books::Show"));
    }
}
