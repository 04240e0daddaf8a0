use std::error::Error as StdError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("library `{name}` is malformed: {reason}")]
    MalformedLibrary { name: String, reason: &'static str },
    #[error("component `{component}` rejected its arguments: {message}")]
    InvalidArguments { component: String, message: String },
}

impl DomainError {
    pub fn malformed_library(name: impl Into<String>, reason: &'static str) -> Self {
        Self::MalformedLibrary {
            name: name.into(),
            reason,
        }
    }

    pub fn invalid_arguments(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            component: component.into(),
            message: message.into(),
        }
    }
}

/// Failure raised while a component produces its markup.
#[derive(Debug, Error)]
#[error("component `{component}` failed to render")]
pub struct ComponentRenderError {
    pub component: String,
    #[source]
    pub source: Box<dyn StdError + Send + Sync>,
}

impl ComponentRenderError {
    pub fn new(
        component: impl Into<String>,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        Self {
            component: component.into(),
            source: source.into(),
        }
    }
}
