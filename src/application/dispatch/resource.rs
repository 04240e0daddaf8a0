use tracing::info;

use crate::application::error::RenderError;
use crate::domain::outcome::{ErrorKind, Outcome};

use super::{Flash, RenderOptions, RenderResponse, ViewResponder};

/// Naming and routing facts about the resource a controller serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// Human name of one record, as used in messages (`Book`).
    pub singular_name: String,
    /// Where a failed lookup redirects to (`/books`).
    pub index_path: String,
}

impl ResourceDescriptor {
    pub fn new(singular_name: impl Into<String>, index_path: impl Into<String>) -> Self {
        Self {
            singular_name: singular_name.into(),
            index_path: index_path.into(),
        }
    }

    pub fn not_found_message(&self, key: &str) -> String {
        format!("{} not found with key \"{key}\"", self.singular_name)
    }
}

/// Responder for resource controllers.
///
/// A failed outcome whose error is [`ErrorKind::NotFound`] redirects to the
/// resource index with a warning flash; everything else renders through the
/// wrapped [`ViewResponder`].
pub struct ResourceResponder {
    responder: ViewResponder,
    resource: ResourceDescriptor,
}

impl ResourceResponder {
    pub fn new(responder: ViewResponder, resource: ResourceDescriptor) -> Self {
        Self {
            responder,
            resource,
        }
    }

    pub fn resource(&self) -> &ResourceDescriptor {
        &self.resource
    }

    pub fn respond(
        &self,
        outcome: impl Into<Outcome>,
        options: RenderOptions,
    ) -> Result<RenderResponse, RenderError> {
        let outcome = outcome.into();

        let not_found = outcome
            .error()
            .filter(|error| !outcome.is_success() && error.kind == ErrorKind::NotFound);

        if let Some(error) = not_found {
            let key = error.value_text();
            info!(
                resource = %self.resource.singular_name,
                attribute = ?error.attribute,
                key = %key,
                location = %self.resource.index_path,
                "Redirecting missing resource to index"
            );
            let mut flash = options.flash;
            flash.push(Flash::warning(self.resource.not_found_message(&key)));
            return Ok(RenderResponse::redirect(
                self.resource.index_path.clone(),
                flash,
            ));
        }

        self.responder.respond(outcome, options)
    }
}
