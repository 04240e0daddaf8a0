pub mod components;
pub mod options;
pub mod views;

use tracing::debug;

use crate::application::registry::ComponentRegistry;
use crate::domain::component::{ComponentClassFn, ComponentNamespace};

/// Register the stock components under `namespace`, returning how many
/// classes were added or replaced.
pub fn register_defaults(registry: &ComponentRegistry, namespace: &ComponentNamespace) -> usize {
    for stock in components::STOCK_COMPONENTS {
        let path = namespace.path_of(stock.relative_path);
        let owned_path = path.clone();
        let build = stock.build;
        registry.register(
            ComponentClassFn::new(path, stock.shape, move |args| build(owned_path.clone(), args))
                .into_ref(),
        );
    }
    debug!(
        namespace = namespace.name(),
        count = components::STOCK_COMPONENTS.len(),
        "Registered stock components"
    );
    components::STOCK_COMPONENTS.len()
}
