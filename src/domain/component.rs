//! The renderable component capability and component classes.
//!
//! A *component* is a constructed, ready-to-render unit of markup. A
//! *component class* is the registered recipe that builds one: it carries the
//! class path under which it can be resolved, the shape of arguments its
//! constructor accepts, and the constructor itself.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::assigns::{Assign, Assigns};
use super::error::{ComponentRenderError, DomainError};
use super::naming::join_scopes;
use super::outcome::Outcome;

/// A constructed component able to produce markup.
pub trait Component: Send + Sync + fmt::Debug {
    /// Class path of the component (`View::Books::Publish`).
    fn class_path(&self) -> &str;

    fn render(&self) -> Result<String, ComponentRenderError>;

    /// Layout components render a whole page and are not wrapped again.
    fn is_layout(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;
}

/// How a component class wants the action result passed to its constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorShape {
    /// The result is the first positional argument.
    Positional,
    /// The result is passed under the `result` key.
    Keyword,
}

/// A resolvable component class.
pub trait ComponentClass: Send + Sync {
    fn path(&self) -> &str;

    fn shape(&self) -> ConstructorShape;

    fn construct(&self, args: ConstructArgs) -> Result<Arc<dyn Component>, DomainError>;
}

pub type ComponentRef = Arc<dyn ComponentClass>;

impl fmt::Debug for dyn ComponentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentClass")
            .field("path", &self.path())
            .field("shape", &self.shape())
            .finish()
    }
}

/// Arguments handed to [`ComponentClass::construct`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructArgs {
    positional: Vec<Assign>,
    named: Assigns,
}

impl ConstructArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Assign) {
        self.positional.push(value);
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Assign) {
        self.named.insert(key, value);
    }

    pub fn positional(&self) -> &[Assign] {
        &self.positional
    }

    pub fn named(&self) -> &Assigns {
        &self.named
    }

    pub fn get(&self, key: &str) -> Option<&Assign> {
        self.named.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.named.value(key)
    }

    /// String value under `key`, if present and a string.
    pub fn str(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(Value::as_str)
    }

    /// The action result, read from wherever `shape` puts it.
    pub fn result(&self, shape: ConstructorShape) -> Option<&Outcome> {
        let slot = match shape {
            ConstructorShape::Positional => self.positional.first(),
            ConstructorShape::Keyword => self.named.get("result"),
        };
        slot.and_then(Assign::as_outcome)
    }
}

type Constructor = dyn Fn(ConstructArgs) -> Result<Arc<dyn Component>, DomainError> + Send + Sync;

/// A component class built from a constructor closure.
pub struct ComponentClassFn {
    path: String,
    shape: ConstructorShape,
    constructor: Box<Constructor>,
}

impl ComponentClassFn {
    pub fn new<F>(path: impl Into<String>, shape: ConstructorShape, constructor: F) -> Self
    where
        F: Fn(ConstructArgs) -> Result<Arc<dyn Component>, DomainError> + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            shape,
            constructor: Box::new(constructor),
        }
    }

    pub fn into_ref(self) -> ComponentRef {
        Arc::new(self)
    }
}

impl ComponentClass for ComponentClassFn {
    fn path(&self) -> &str {
        &self.path
    }

    fn shape(&self) -> ConstructorShape {
        self.shape
    }

    fn construct(&self, args: ConstructArgs) -> Result<Arc<dyn Component>, DomainError> {
        (self.constructor)(args)
    }
}

/// The shared components namespace (`Shared`, `Acme::Ui`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentNamespace {
    name: String,
}

impl ComponentNamespace {
    /// Returns `None` for blank names; an empty namespace is the same as none.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into().trim().trim_matches(':').to_string();
        (!name.is_empty()).then_some(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class path of `relative` inside this namespace.
    pub fn path_of(&self, relative: &str) -> String {
        join_scopes([self.name.as_str(), relative])
    }
}
