//! Process-wide resolvers, one per dispatcher kind.
//!
//! Building a resolver validates every library, so it happens once per
//! dispatcher kind and the result is shared by every request that dispatcher
//! serves. The registry is passed to the request layer explicitly and can be
//! reset, for example after components are reloaded.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::domain::error::DomainError;

use super::resolver::ViewResolver;

#[derive(Default, Clone)]
pub struct ResolverRegistry {
    resolvers: Arc<DashMap<String, Arc<ViewResolver>>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The resolver for `key`, building it with `init` on first use.
    ///
    /// A failed build is not memoized; the next call tries again.
    pub fn get_or_try_init<F>(&self, key: &str, init: F) -> Result<Arc<ViewResolver>, DomainError>
    where
        F: FnOnce() -> Result<ViewResolver, DomainError>,
    {
        if let Some(existing) = self.resolvers.get(key) {
            return Ok(Arc::clone(existing.value()));
        }

        match self.resolvers.entry(key.to_string()) {
            Entry::Occupied(occupied) => Ok(Arc::clone(occupied.get())),
            Entry::Vacant(vacant) => {
                let resolver = Arc::new(init()?);
                debug!(dispatcher = key, "Built view resolver");
                vacant.insert(Arc::clone(&resolver));
                Ok(resolver)
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<ViewResolver>> {
        self.resolvers
            .get(key)
            .map(|resolver| Arc::clone(resolver.value()))
    }

    /// Forget the resolver for `key`; the next lookup rebuilds it.
    pub fn reset(&self, key: &str) -> bool {
        self.resolvers.remove(key).is_some()
    }

    pub fn reset_all(&self) {
        self.resolvers.clear();
    }

    /// Clear the resolution cache of every memoized resolver, keeping the
    /// resolvers themselves.
    pub fn clear_caches(&self) {
        for resolver in self.resolvers.iter() {
            resolver.value().clear();
        }
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}
