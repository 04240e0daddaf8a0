//! HTML options shared by leaf components.
//!
//! Components compose an [`HtmlOptions`] instead of each parsing `id`,
//! `class` and `data` arguments on its own.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::domain::component::ConstructArgs;

use super::views::display_value;

/// Ordered set of CSS class names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList(Vec<String>);

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every whitespace-separated class in `classes`, skipping repeats.
    pub fn add(&mut self, classes: &str) {
        for class in classes.split_whitespace() {
            if !self.0.iter().any(|existing| existing == class) {
                self.0.push(class.to_string());
            }
        }
    }

    pub fn with(mut self, classes: &str) -> Self {
        self.add(classes);
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.0.iter().any(|existing| existing == class)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ClassList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlOptions {
    pub id: Option<String>,
    pub classes: ClassList,
    /// `data-*` attributes, keyed without the prefix.
    pub data: BTreeMap<String, String>,
}

impl HtmlOptions {
    /// Options for a component whose own classes are `base`, extended by the
    /// caller's `id`, `class` and `data` arguments.
    pub fn from_args(base: &str, args: &ConstructArgs) -> Self {
        let mut classes = ClassList::new().with(base);
        if let Some(extra) = args.str("class") {
            classes.add(extra);
        }

        let data = match args.value("data") {
            Some(Value::Object(entries)) => entries
                .iter()
                .map(|(key, value)| (key.replace('_', "-"), display_value(value)))
                .collect(),
            _ => BTreeMap::new(),
        };

        Self {
            id: args
                .str("id")
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            classes,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::assigns::Assign;

    #[test]
    fn class_list_skips_duplicates() {
        let mut classes = ClassList::new().with("btn btn-primary");
        classes.add("btn  wide");
        assert_eq!(classes.to_string(), "btn btn-primary wide");
        assert!(classes.contains("wide"));
    }

    #[test]
    fn options_merge_caller_arguments() {
        let mut args = ConstructArgs::new();
        args.insert("id", Assign::Value(json!(" save ")));
        args.insert("class", Assign::Value(json!("wide")));
        args.insert(
            "data",
            Assign::Value(json!({"confirm_text": "Sure?", "count": 3})),
        );

        let options = HtmlOptions::from_args("btn", &args);
        assert_eq!(options.id.as_deref(), Some("save"));
        assert_eq!(options.classes.to_string(), "btn wide");
        assert_eq!(options.data.get("confirm-text").map(String::as_str), Some("Sure?"));
        assert_eq!(options.data.get("count").map(String::as_str), Some("3"));
    }

    #[test]
    fn blank_ids_are_dropped() {
        let mut args = ConstructArgs::new();
        args.insert("id", Assign::Value(json!("  ")));
        assert!(HtmlOptions::from_args("", &args).id.is_none());
        assert!(HtmlOptions::from_args("", &args).classes.is_empty());
    }
}
