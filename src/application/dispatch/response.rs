use std::any::Any;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};

use crate::application::error::RenderError;
use crate::domain::assigns::Assigns;
use crate::domain::component::Component;
use crate::domain::error::ComponentRenderError;

/// Emitted when neither a component nor a missing-view page can be found.
pub const VIEW_NOT_FOUND_HTML: &str = "<h1>View Not Found</h1>";

/// Layout a rendered component should be wrapped in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    Named(String),
    /// No wrapping layout; the component renders the whole document.
    Bare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Notice,
    Success,
    Warning,
    Alert,
}

impl FlashKind {
    pub fn as_variant(self) -> &'static str {
        match self {
            FlashKind::Notice => "notice",
            FlashKind::Success => "success",
            FlashKind::Warning => "warning",
            FlashKind::Alert => "alert",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn new(kind: FlashKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn notice(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Notice, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(FlashKind::Warning, message)
    }
}

/// Flash messages carried on a response for the session layer to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashMessages(pub Vec<Flash>);

#[derive(Clone)]
pub enum ResponseBody {
    Component(Arc<dyn Component>),
    Html(String),
    Redirect { location: String },
}

impl std::fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseBody::Component(component) => f
                .debug_tuple("Component")
                .field(&component.class_path())
                .finish(),
            ResponseBody::Html(html) => f.debug_tuple("Html").field(html).finish(),
            ResponseBody::Redirect { location } => f
                .debug_struct("Redirect")
                .field("location", location)
                .finish(),
        }
    }
}

/// A dispatched render, ready to become an HTTP response.
#[derive(Debug, Clone)]
pub struct RenderResponse {
    pub body: ResponseBody,
    pub assigns: Assigns,
    pub layout: Option<Layout>,
    pub flash: Vec<Flash>,
    pub status: StatusCode,
}

impl RenderResponse {
    pub fn view_not_found() -> Self {
        Self {
            body: ResponseBody::Html(VIEW_NOT_FOUND_HTML.to_string()),
            assigns: Assigns::new(),
            layout: None,
            flash: Vec::new(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn redirect(location: impl Into<String>, flash: Vec<Flash>) -> Self {
        Self {
            body: ResponseBody::Redirect {
                location: location.into(),
            },
            assigns: Assigns::new(),
            layout: None,
            flash,
            status: StatusCode::SEE_OTHER,
        }
    }

    pub fn component(&self) -> Option<&Arc<dyn Component>> {
        match &self.body {
            ResponseBody::Component(component) => Some(component),
            _ => None,
        }
    }

    /// The wrapped component as its concrete type.
    pub fn downcast<T: Any>(&self) -> Option<&T> {
        self.component()
            .and_then(|component| component.as_any().downcast_ref::<T>())
    }

    pub fn redirect_location(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Redirect { location } => Some(location),
            _ => None,
        }
    }

    /// Markup of the response body; redirects have none.
    pub fn render_body(&self) -> Result<String, ComponentRenderError> {
        match &self.body {
            ResponseBody::Component(component) => component.render(),
            ResponseBody::Html(html) => Ok(html.clone()),
            ResponseBody::Redirect { .. } => Ok(String::new()),
        }
    }
}

impl IntoResponse for RenderResponse {
    fn into_response(self) -> Response {
        let RenderResponse {
            body,
            layout,
            flash,
            status,
            ..
        } = self;

        let mut response = match body {
            ResponseBody::Component(component) => match component.render() {
                Ok(html) => (status, Html(html)).into_response(),
                Err(err) => return RenderError::from(err).into_response(),
            },
            ResponseBody::Html(html) => (status, Html(html)).into_response(),
            ResponseBody::Redirect { location } => Redirect::to(&location).into_response(),
        };

        if !flash.is_empty() {
            response.extensions_mut().insert(FlashMessages(flash));
        }
        if let Some(layout) = layout {
            response.extensions_mut().insert(layout);
        }
        response
    }
}
