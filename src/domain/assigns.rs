//! Render assigns: the named values a rendered component can read.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde_json::Value;

use super::outcome::{Outcome, Payload};

/// Prefix marking entries of a result value that are lifted into assigns.
pub const ASSIGN_PREFIX: char = '_';

#[derive(Debug, Clone, PartialEq)]
pub enum Assign {
    Result(Outcome),
    Value(Value),
}

impl Assign {
    pub fn as_outcome(&self) -> Option<&Outcome> {
        match self {
            Assign::Result(outcome) => Some(outcome),
            Assign::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Assign::Value(value) => Some(value),
            Assign::Result(_) => None,
        }
    }
}

impl From<Value> for Assign {
    fn from(value: Value) -> Self {
        Assign::Value(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assigns(BTreeMap<String, Assign>);

impl Assigns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns for rendering `outcome`.
    ///
    /// Merged in order, later keys winning: `result`, the outcome metadata,
    /// then every `_`-prefixed entry of an object value with the prefix
    /// removed.
    pub fn for_outcome(outcome: &Outcome) -> Self {
        let mut assigns = Self::new();
        assigns.insert("result", Assign::Result(outcome.clone()));

        for (key, value) in outcome.metadata() {
            assigns.insert(key.clone(), Assign::Value(value.clone()));
        }

        if let Payload::Data(Value::Object(entries)) = outcome.value() {
            for (key, value) in entries {
                if let Some(stripped) = key.strip_prefix(ASSIGN_PREFIX) {
                    assigns.insert(stripped, Assign::Value(value.clone()));
                }
            }
        }

        assigns
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Assign) -> Option<Assign> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Assign> {
        self.0.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&Value> {
        self.get(key).and_then(Assign::as_value)
    }

    pub fn result(&self) -> Option<&Outcome> {
        self.get("result").and_then(Assign::as_outcome)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Assign> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Assigns {
    type Item = (&'a String, &'a Assign);
    type IntoIter = btree_map::Iter<'a, String, Assign>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
