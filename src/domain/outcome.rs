//! Action outcomes handed to the render dispatcher.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::component::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Success,
    Failure,
}

/// Failure categories a responder can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Invalid,
    Unauthorized,
    Unexpected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeError {
    pub kind: ErrorKind,
    /// Attribute the failure is about (`slug` for a lookup by slug).
    pub attribute: Option<String>,
    /// Offending attribute value.
    pub value: Option<Value>,
    pub message: String,
}

impl OutcomeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            attribute: None,
            value: None,
            message: message.into(),
        }
    }

    pub fn not_found(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        let attribute = attribute.into();
        let value = value.into();
        Self {
            kind: ErrorKind::NotFound,
            message: format!("no record with {attribute} {value}"),
            attribute: Some(attribute),
            value: Some(value),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// The offending value as display text; strings are shown unquoted.
    pub fn value_text(&self) -> String {
        match &self.value {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}

/// What an action produced: plain data, or a component ready to render.
#[derive(Clone)]
pub enum Payload {
    Data(Value),
    Component(Arc<dyn Component>),
}

impl Payload {
    pub fn as_data(&self) -> Option<&Value> {
        match self {
            Payload::Data(value) => Some(value),
            Payload::Component(_) => None,
        }
    }

    pub fn as_component(&self) -> Option<&Arc<dyn Component>> {
        match self {
            Payload::Component(component) => Some(component),
            Payload::Data(_) => None,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Data(value) => f.debug_tuple("Data").field(value).finish(),
            Payload::Component(component) => f
                .debug_tuple("Component")
                .field(&component.class_path())
                .finish(),
        }
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Payload::Data(left), Payload::Data(right)) => left == right,
            (Payload::Component(left), Payload::Component(right)) => Arc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Data(value)
    }
}

impl From<Arc<dyn Component>> for Payload {
    fn from(component: Arc<dyn Component>) -> Self {
        Payload::Component(component)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    status: OutcomeStatus,
    value: Payload,
    error: Option<OutcomeError>,
    metadata: Map<String, Value>,
}

impl Outcome {
    pub fn success(value: impl Into<Payload>) -> Self {
        Self {
            status: OutcomeStatus::Success,
            value: value.into(),
            error: None,
            metadata: Map::new(),
        }
    }

    pub fn failure(error: OutcomeError) -> Self {
        Self {
            status: OutcomeStatus::Failure,
            value: Payload::Data(Value::Null),
            error: Some(error),
            metadata: Map::new(),
        }
    }

    pub fn with_value(self, value: impl Into<Payload>) -> Self {
        Self {
            value: value.into(),
            ..self
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn status(&self) -> OutcomeStatus {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }

    pub fn value(&self) -> &Payload {
        &self.value
    }

    pub fn error(&self) -> Option<&OutcomeError> {
        self.error.as_ref()
    }

    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }
}

impl From<Arc<dyn Component>> for Outcome {
    fn from(component: Arc<dyn Component>) -> Self {
        Outcome::success(component)
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Outcome::success(value)
    }
}
