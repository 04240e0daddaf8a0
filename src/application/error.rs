use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    domain::error::{ComponentRenderError, DomainError},
    infra::error::InfraError,
};

#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn from_error(source: &'static str, status: StatusCode, error: &dyn StdError) -> Self {
        let mut messages = vec![error.to_string()];
        let mut current = error.source();
        while let Some(inner) = current {
            messages.push(inner.to_string());
            current = inner.source();
        }
        Self {
            source,
            status,
            messages,
        }
    }

    pub fn attach(self, response: &mut Response) {
        response.extensions_mut().insert(self);
    }
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    public_message: &'static str,
    report: ErrorReport,
}

impl HttpError {
    pub fn from_error(
        source: &'static str,
        status: StatusCode,
        public_message: &'static str,
        error: &dyn StdError,
    ) -> Self {
        let report = ErrorReport::from_error(source, status, error);
        Self {
            status,
            public_message,
            report,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.public_message).into_response();
        self.report.attach(&mut response);
        response
    }
}

/// Failures of a single render dispatch.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no component found for action `{action}` of controller `{controller}`")]
    ComponentNotFound { action: String, controller: String },
    #[error("component `{path}` could not be constructed")]
    Construct {
        path: String,
        #[source]
        source: DomainError,
    },
    #[error(transparent)]
    Render(#[from] ComponentRenderError),
}

impl RenderError {
    pub fn not_found(action: impl Into<String>, controller: impl Into<String>) -> Self {
        Self::ComponentNotFound {
            action: action.into(),
            controller: controller.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RenderError::ComponentNotFound { .. })
    }
}

impl From<RenderError> for HttpError {
    fn from(error: RenderError) -> Self {
        let public_message = match &error {
            RenderError::ComponentNotFound { .. } => "View not found",
            RenderError::Construct { .. } | RenderError::Render(_) => "View rendering failed",
        };
        HttpError::from_error(
            "application::error::RenderError",
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

impl IntoResponse for RenderError {
    fn into_response(self) -> Response {
        HttpError::from(self).into_response()
    }
}

/// Top-level error of the `viewkit` binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("validation failed: {0}")]
    Validation(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_action_and_controller() {
        let error = RenderError::not_found("Publish", "Books");
        assert!(error.is_not_found());
        assert_eq!(
            error.to_string(),
            "no component found for action `Publish` of controller `Books`"
        );
    }

    #[test]
    fn render_errors_become_internal_server_errors() {
        let response = RenderError::not_found("Publish", "Books").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let report = response
            .extensions()
            .get::<ErrorReport>()
            .expect("report attached");
        assert_eq!(report.source, "application::error::RenderError");
        assert!(report.messages[0].contains("`Publish`"));
    }

    #[test]
    fn report_collects_source_chain() {
        let error = RenderError::Construct {
            path: "View::Books::Publish".to_string(),
            source: DomainError::invalid_arguments("View::Books::Publish", "missing book"),
        };
        let http = HttpError::from(error);
        assert_eq!(http.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(http.public_message, "View rendering failed");
        assert_eq!(http.report.messages.len(), 2);
        assert!(http.report.messages[1].contains("missing book"));
    }
}
