use axum::http::StatusCode;
use metrics::counter;
use serde_json::Value;
use tracing::{error, warn};

use crate::application::error::RenderError;
use crate::domain::outcome::Outcome;

use super::{RenderDispatcher, RenderOptions, RenderResponse, with_outcome_status};

/// Class rendered when no view exists, relative to the components namespace.
pub const MISSING_VIEW_CLASS: &str = "Views::MissingView";

pub(crate) const METRIC_RENDER_FALLBACK: &str = "viewkit_render_fallback_total";

/// A dispatcher that recovers from missing views.
///
/// Renders [`MISSING_VIEW_CLASS`] with the paths that were tried, and emits
/// [`super::VIEW_NOT_FOUND_HTML`] when that class is not registered either.
pub struct ViewResponder {
    dispatcher: RenderDispatcher,
}

impl ViewResponder {
    pub fn new(dispatcher: RenderDispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &RenderDispatcher {
        &self.dispatcher
    }

    pub fn render_result(
        &self,
        outcome: impl Into<Outcome>,
        options: RenderOptions,
    ) -> Result<RenderResponse, RenderError> {
        let outcome = outcome.into();
        match self.dispatcher.render_result(outcome.clone(), options.clone()) {
            Err(RenderError::ComponentNotFound { action, controller }) => {
                self.render_missing_view(&action, &controller, &outcome, options)
            }
            other => other,
        }
    }

    /// Render `outcome` at `200 OK` on success or `500` on failure.
    pub fn respond(
        &self,
        outcome: impl Into<Outcome>,
        options: RenderOptions,
    ) -> Result<RenderResponse, RenderError> {
        let outcome = outcome.into();
        let options = with_outcome_status(&outcome, options);
        self.render_result(outcome, options)
    }

    fn render_missing_view(
        &self,
        action: &str,
        controller: &str,
        outcome: &Outcome,
        options: RenderOptions,
    ) -> Result<RenderResponse, RenderError> {
        let Some(class) = self.dispatcher.find_component_class(MISSING_VIEW_CLASS, None) else {
            counter!(METRIC_RENDER_FALLBACK).increment(1);
            error!(
                action,
                controller,
                "Missing view component is not registered; emitting bare fallback"
            );
            return Ok(RenderResponse::view_not_found());
        };

        let view_paths = self.dispatcher.resolver().view_paths(action, controller);
        warn!(
            action,
            controller,
            tried = view_paths.len(),
            "Rendering missing view page"
        );

        let mut extra = options.extra.clone();
        extra.insert(
            "expected_page".to_string(),
            view_paths.first().cloned().map_or(Value::Null, Value::String),
        );
        extra.insert(
            "view_paths".to_string(),
            Value::Array(view_paths.into_iter().map(Value::String).collect()),
        );

        let component = self.dispatcher.instantiate(&class, outcome, &extra)?;
        let options = options.status(StatusCode::INTERNAL_SERVER_ERROR);
        Ok(self.dispatcher.build_response(component, outcome, options))
    }
}
