//! View resolution and render dispatch.

pub mod dispatch;
pub mod error;
mod lock;
pub mod registry;
pub mod resolver;
pub mod resolvers;
