use askama::{Error as AskamaError, Template};
use thiserror::Error;

use crate::domain::error::ComponentRenderError;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }

    pub fn origin(&self) -> &'static str {
        self.source
    }
}

/// Render `template` on behalf of the component at `class_path`.
pub fn render_template<T: Template>(
    class_path: &str,
    template: &T,
) -> Result<String, ComponentRenderError> {
    template.render().map_err(|err| {
        ComponentRenderError::new(
            class_path,
            TemplateRenderError::new(
                "presentation::views::render_template",
                "Template rendering failed",
                err,
            ),
        )
    })
}

/// Text shown for a JSON cell: strings unquoted, `null` empty.
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
