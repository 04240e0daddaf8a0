//! Render dispatch: from an action outcome to a response-ready component.
//!
//! A dispatcher serves one controller. For each call it picks the component
//! (the outcome itself, the outcome's value, or a class from the
//! [`ViewResolver`]), constructs it in the shape the class declares, and wraps
//! it in a [`RenderResponse`] with merged assigns.
//!
//! [`RenderDispatcher`] reports a missing component as
//! [`RenderError::ComponentNotFound`]. [`ViewResponder`] recovers by
//! rendering the missing-view page, and [`ResourceResponder`] additionally
//! redirects resource lookups that came back not found.

mod resource;
mod responder;
mod response;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::assigns::{Assign, Assigns};
use crate::domain::component::{
    Component, ComponentRef, ConstructArgs, ConstructorShape,
};
use crate::domain::naming::canonicalize_dotted;
use crate::domain::outcome::{Outcome, Payload};

use super::error::RenderError;

/// Constructor arguments the dispatcher always supplies itself.
const RESERVED_ARGS: [&str; 2] = ["result", "resource"];
use super::resolver::ViewResolver;

pub use resource::{ResourceDescriptor, ResourceResponder};
pub(crate) use responder::METRIC_RENDER_FALLBACK;
pub use responder::{MISSING_VIEW_CLASS, ViewResponder};
pub use response::{
    Flash, FlashKind, FlashMessages, Layout, RenderResponse, ResponseBody, VIEW_NOT_FOUND_HTML,
};

/// Per-call options of [`RenderDispatcher::render_result`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Action to render; defaults to the dispatcher's current action.
    pub action: Option<String>,
    pub flash: Vec<Flash>,
    pub layout: Option<Layout>,
    pub status: Option<StatusCode>,
    /// Extra constructor arguments for the component.
    pub extra: Map<String, Value>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn flash(mut self, flash: Flash) -> Self {
        self.flash.push(flash);
        self
    }

    pub fn layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

pub struct RenderDispatcher {
    controller: String,
    action: String,
    resource: Value,
    resolver: Arc<ViewResolver>,
}

impl RenderDispatcher {
    pub fn new(
        resolver: Arc<ViewResolver>,
        controller: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
            resource: Value::Null,
            resolver,
        }
    }

    /// Context value passed to every constructed component as `resource`.
    pub fn with_resource(mut self, resource: impl Into<Value>) -> Self {
        self.resource = resource.into();
        self
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn resolver(&self) -> &Arc<ViewResolver> {
        &self.resolver
    }

    /// Render `outcome` with the component found for the action.
    pub fn render_result(
        &self,
        outcome: impl Into<Outcome>,
        options: RenderOptions,
    ) -> Result<RenderResponse, RenderError> {
        let outcome = outcome.into();
        let action = self.action_for(&options);

        match self.find_component(&action, &self.controller, &outcome, &options.extra)? {
            Some(component) => Ok(self.build_response(component, &outcome, options)),
            None => {
                warn!(
                    action = %action,
                    controller = %self.controller,
                    "No component found for action"
                );
                Err(RenderError::not_found(action, self.controller.clone()))
            }
        }
    }

    /// Render `outcome` at `200 OK` on success or `500` on failure, unless the
    /// caller chose a status.
    pub fn respond(
        &self,
        outcome: impl Into<Outcome>,
        options: RenderOptions,
    ) -> Result<RenderResponse, RenderError> {
        let outcome = outcome.into();
        let options = with_outcome_status(&outcome, options);
        self.render_result(outcome, options)
    }

    /// The component rendering `outcome` for `(action, controller)`.
    pub fn find_component(
        &self,
        action: &str,
        controller: &str,
        outcome: &Outcome,
        extra: &Map<String, Value>,
    ) -> Result<Option<Arc<dyn Component>>, RenderError> {
        if let Payload::Component(component) = outcome.value() {
            debug!(component = component.class_path(), "Rendering component result directly");
            return Ok(Some(Arc::clone(component)));
        }

        match self.resolver.resolve(action, controller) {
            Some(class) => self.instantiate(&class, outcome, extra).map(Some),
            None => Ok(None),
        }
    }

    /// Class `name` from the shared components namespace, or `default`.
    ///
    /// `name` may be dotted (`forms.text_field`) or scoped
    /// (`Forms::TextField`).
    pub fn find_component_class(
        &self,
        name: &str,
        default: Option<ComponentRef>,
    ) -> Option<ComponentRef> {
        let Some(namespace) = self.resolver.components_namespace() else {
            return default;
        };
        let path = namespace.path_of(&canonicalize_dotted(name));
        let registry = self.resolver.registry();
        if registry.class_exists(&path) {
            registry.resolve_class(&path).or(default)
        } else {
            default
        }
    }

    /// Construct `class` for `outcome`, honouring its declared shape.
    pub(crate) fn instantiate(
        &self,
        class: &ComponentRef,
        outcome: &Outcome,
        extra: &Map<String, Value>,
    ) -> Result<Arc<dyn Component>, RenderError> {
        let mut args = ConstructArgs::new();
        match class.shape() {
            ConstructorShape::Positional => args.push(Assign::Result(outcome.clone())),
            ConstructorShape::Keyword => args.insert("result", Assign::Result(outcome.clone())),
        }
        args.insert("resource", Assign::Value(self.resource.clone()));
        for (key, value) in extra {
            if RESERVED_ARGS.contains(&key.as_str()) {
                debug!(
                    class = class.path(),
                    key = %key,
                    "Ignoring extra that shadows a reserved constructor argument"
                );
                continue;
            }
            args.insert(key.clone(), Assign::Value(value.clone()));
        }

        class
            .construct(args)
            .map_err(|source| RenderError::Construct {
                path: class.path().to_string(),
                source,
            })
    }

    pub(crate) fn build_response(
        &self,
        component: Arc<dyn Component>,
        outcome: &Outcome,
        options: RenderOptions,
    ) -> RenderResponse {
        let layout = options
            .layout
            .or_else(|| component.is_layout().then_some(Layout::Bare));

        RenderResponse {
            assigns: Assigns::for_outcome(outcome),
            body: ResponseBody::Component(component),
            layout,
            flash: options.flash,
            status: options.status.unwrap_or(StatusCode::OK),
        }
    }

    pub(crate) fn action_for(&self, options: &RenderOptions) -> String {
        options
            .action
            .clone()
            .unwrap_or_else(|| self.action.clone())
    }
}

pub(crate) fn with_outcome_status(outcome: &Outcome, options: RenderOptions) -> RenderOptions {
    if options.status.is_some() {
        return options;
    }
    let status = if outcome.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    options.status(status)
}
