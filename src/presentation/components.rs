//! Stock components shipped with the kit.
//!
//! Every component here is registered by [`super::register_defaults`] under
//! the shared components namespace, e.g. `Shared::Button` or
//! `Shared::Views::MissingView`.

use std::any::Any;
use std::sync::Arc;

use askama::Template;
use serde_json::Value;

use crate::application::dispatch::{Flash, FlashKind, MISSING_VIEW_CLASS};
use crate::domain::component::{Component, ConstructArgs, ConstructorShape};
use crate::domain::error::{ComponentRenderError, DomainError};
use crate::domain::outcome::Payload;

use super::options::{ClassList, HtmlOptions};
use super::views::{display_value, render_template};

/// A stock component: its path relative to the namespace, the constructor
/// shape it declares, and its constructor.
pub struct StockComponent {
    pub relative_path: &'static str,
    pub shape: ConstructorShape,
    pub build: fn(String, ConstructArgs) -> Result<Arc<dyn Component>, DomainError>,
}

pub const STOCK_COMPONENTS: [StockComponent; 6] = [
    StockComponent {
        relative_path: Alert::PATH,
        shape: ConstructorShape::Keyword,
        build: Alert::build,
    },
    StockComponent {
        relative_path: Button::PATH,
        shape: ConstructorShape::Keyword,
        build: Button::build,
    },
    StockComponent {
        relative_path: Icon::PATH,
        shape: ConstructorShape::Keyword,
        build: Icon::build,
    },
    StockComponent {
        relative_path: Table::PATH,
        shape: ConstructorShape::Keyword,
        build: Table::build,
    },
    StockComponent {
        relative_path: MissingView::PATH,
        shape: ConstructorShape::Keyword,
        build: MissingView::build,
    },
    StockComponent {
        relative_path: PageLayout::PATH,
        shape: ConstructorShape::Positional,
        build: PageLayout::build,
    },
];

fn required_str(class_path: &str, args: &ConstructArgs, key: &str) -> Result<String, DomainError> {
    args.str(key)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| DomainError::invalid_arguments(class_path, format!("`{key}` is required")))
}

fn optional_str(args: &ConstructArgs, key: &str) -> Option<String> {
    args.str(key)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

macro_rules! component_impl {
    ($component:ty, $template:ident) => {
        impl Component for $component {
            fn class_path(&self) -> &str {
                &self.class_path
            }

            fn render(&self) -> Result<String, ComponentRenderError> {
                render_template(&self.class_path, &$template { view: self })
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

#[derive(Debug, Clone)]
pub struct Alert {
    pub class_path: String,
    pub kind: FlashKind,
    pub message: String,
    pub dismissible: bool,
    pub options: HtmlOptions,
}

impl Alert {
    pub const PATH: &'static str = "Alert";

    pub fn build(class_path: String, args: ConstructArgs) -> Result<Arc<dyn Component>, DomainError> {
        let message = required_str(&class_path, &args, "message")?;
        let kind = match args.value("kind") {
            None | Some(Value::Null) => FlashKind::Notice,
            Some(kind) => serde_json::from_value(kind.clone()).map_err(|err| {
                DomainError::invalid_arguments(&class_path, format!("unknown alert kind: {err}"))
            })?,
        };
        let dismissible = args
            .value("dismissible")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let options = HtmlOptions::from_args("alert", &args);

        Ok(Arc::new(Self {
            class_path,
            kind,
            message,
            dismissible,
            options,
        }))
    }

    /// Alert showing a flash message.
    pub fn from_flash(class_path: impl Into<String>, flash: &Flash) -> Self {
        Self {
            class_path: class_path.into(),
            kind: flash.kind,
            message: flash.message.clone(),
            dismissible: true,
            options: HtmlOptions {
                classes: ClassList::new().with("alert"),
                ..HtmlOptions::default()
            },
        }
    }
}

#[derive(Template)]
#[template(path = "components/alert.html")]
struct AlertTemplate<'a> {
    view: &'a Alert,
}

component_impl!(Alert, AlertTemplate);

#[derive(Debug, Clone)]
pub struct Button {
    pub class_path: String,
    pub label: String,
    pub href: Option<String>,
    pub button_type: String,
    pub options: HtmlOptions,
}

impl Button {
    pub const PATH: &'static str = "Button";

    pub fn build(class_path: String, args: ConstructArgs) -> Result<Arc<dyn Component>, DomainError> {
        let label = required_str(&class_path, &args, "label")?;
        let variant = optional_str(&args, "variant").unwrap_or_else(|| "primary".to_string());
        let options = HtmlOptions::from_args(&format!("btn btn-{variant}"), &args);

        Ok(Arc::new(Self {
            class_path,
            label,
            href: optional_str(&args, "href"),
            button_type: optional_str(&args, "type").unwrap_or_else(|| "button".to_string()),
            options,
        }))
    }
}

#[derive(Template)]
#[template(path = "components/button.html")]
struct ButtonTemplate<'a> {
    view: &'a Button,
}

component_impl!(Button, ButtonTemplate);

#[derive(Debug, Clone)]
pub struct Icon {
    pub class_path: String,
    pub name: String,
    /// Accessible label; unlabelled icons are hidden from assistive tech.
    pub label: Option<String>,
    pub options: HtmlOptions,
}

impl Icon {
    pub const PATH: &'static str = "Icon";

    pub fn build(class_path: String, args: ConstructArgs) -> Result<Arc<dyn Component>, DomainError> {
        let name = required_str(&class_path, &args, "name")?;
        let options = HtmlOptions::from_args(&format!("icon icon-{name}"), &args);

        Ok(Arc::new(Self {
            class_path,
            label: optional_str(&args, "label"),
            name,
            options,
        }))
    }
}

#[derive(Template)]
#[template(path = "components/icon.html")]
struct IconTemplate<'a> {
    view: &'a Icon,
}

component_impl!(Icon, IconTemplate);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRowView {
    pub cells: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Table {
    pub class_path: String,
    pub columns: Vec<String>,
    pub rows: Vec<TableRowView>,
    pub empty_message: String,
    pub options: HtmlOptions,
}

impl Table {
    pub const PATH: &'static str = "Table";

    /// Rows come from `rows`, or from an array result when rendered for an
    /// action. Object rows are read by column name.
    pub fn build(class_path: String, args: ConstructArgs) -> Result<Arc<dyn Component>, DomainError> {
        let columns: Vec<String> = match args.value("columns") {
            Some(Value::Array(columns)) => columns.iter().map(display_value).collect(),
            _ => {
                return Err(DomainError::invalid_arguments(
                    &class_path,
                    "`columns` must be a list",
                ));
            }
        };

        let result_rows = args
            .result(ConstructorShape::Keyword)
            .and_then(|outcome| match outcome.value() {
                Payload::Data(Value::Array(rows)) => Some(rows),
                _ => None,
            });
        let rows = match args.value("rows") {
            Some(Value::Array(rows)) => Some(rows),
            _ => result_rows,
        };

        let rows = rows
            .map(|rows| rows.iter().map(|row| table_row(&columns, row)).collect())
            .unwrap_or_default();

        Ok(Arc::new(Self {
            class_path,
            columns,
            rows,
            empty_message: optional_str(&args, "empty_message")
                .unwrap_or_else(|| "Nothing to show".to_string()),
            options: HtmlOptions::from_args("table", &args),
        }))
    }
}

fn table_row(columns: &[String], row: &Value) -> TableRowView {
    let cells = match row {
        Value::Array(cells) => cells.iter().map(display_value).collect(),
        Value::Object(fields) => columns
            .iter()
            .map(|column| {
                fields
                    .get(column)
                    .or_else(|| fields.get(&column.to_lowercase()))
                    .map(display_value)
                    .unwrap_or_default()
            })
            .collect(),
        other => vec![display_value(other)],
    };
    TableRowView { cells }
}

#[derive(Template)]
#[template(path = "components/table.html")]
struct TableTemplate<'a> {
    view: &'a Table,
}

component_impl!(Table, TableTemplate);

/// Diagnostic page rendered when no view exists for an action.
#[derive(Debug, Clone)]
pub struct MissingView {
    pub class_path: String,
    /// The highest-precedence path that was expected to hold the view.
    pub expected_page: String,
    /// Every candidate path that was tried, in probe order.
    pub view_paths: Vec<String>,
}

impl MissingView {
    pub const PATH: &'static str = MISSING_VIEW_CLASS;

    pub fn build(class_path: String, args: ConstructArgs) -> Result<Arc<dyn Component>, DomainError> {
        let view_paths = match args.value("view_paths") {
            Some(Value::Array(paths)) => paths.iter().map(display_value).collect(),
            _ => Vec::new(),
        };

        Ok(Arc::new(Self {
            class_path,
            expected_page: optional_str(&args, "expected_page").unwrap_or_default(),
            view_paths,
        }))
    }
}

#[derive(Template)]
#[template(path = "components/missing_view.html")]
struct MissingViewTemplate<'a> {
    view: &'a MissingView,
}

component_impl!(MissingView, MissingViewTemplate);

/// A whole-document layout. Responses rendering it are not wrapped again.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub class_path: String,
    pub title: String,
    pub content: String,
}

impl PageLayout {
    pub const PATH: &'static str = "PageLayout";

    /// The title is the `title` argument, else the result's `title` metadata.
    pub fn build(class_path: String, args: ConstructArgs) -> Result<Arc<dyn Component>, DomainError> {
        let title = optional_str(&args, "title")
            .or_else(|| {
                args.result(ConstructorShape::Positional)
                    .and_then(|outcome| outcome.metadata().get("title"))
                    .map(display_value)
            })
            .unwrap_or_default();

        Ok(Arc::new(Self {
            class_path,
            title,
            content: args.str("content").unwrap_or_default().to_string(),
        }))
    }
}

#[derive(Template)]
#[template(path = "components/page_layout.html")]
struct PageLayoutTemplate<'a> {
    view: &'a PageLayout,
}

impl Component for PageLayout {
    fn class_path(&self) -> &str {
        &self.class_path
    }

    fn render(&self) -> Result<String, ComponentRenderError> {
        render_template(&self.class_path, &PageLayoutTemplate { view: self })
    }

    fn is_layout(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::assigns::Assign;
    use crate::domain::outcome::Outcome;

    fn args(entries: Value) -> ConstructArgs {
        let mut args = ConstructArgs::new();
        if let Value::Object(entries) = entries {
            for (key, value) in entries {
                args.insert(key, Assign::Value(value));
            }
        }
        args
    }

    fn downcast<T: 'static>(component: &Arc<dyn Component>) -> &T {
        component.as_any().downcast_ref::<T>().expect("component type")
    }

    #[test]
    fn alert_renders_kind_and_message() {
        let component = Alert::build(
            "Shared::Alert".to_string(),
            args(json!({"kind": "warning", "message": "Book not found", "dismissible": true})),
        )
        .expect("builds");

        let alert = downcast::<Alert>(&component);
        assert_eq!(alert.kind, FlashKind::Warning);

        let html = component.render().expect("renders");
        assert!(html.contains("alert-warning"));
        assert!(html.contains("Book not found"));
        assert!(html.contains("alert__dismiss"));
    }

    #[test]
    fn alert_rejects_unknown_kinds() {
        let result = Alert::build(
            "Shared::Alert".to_string(),
            args(json!({"kind": "shout", "message": "Hi"})),
        );
        assert!(matches!(result, Err(DomainError::InvalidArguments { .. })));
    }

    #[test]
    fn alert_from_flash_is_dismissible() {
        let alert = Alert::from_flash("Shared::Alert", &Flash::notice("Saved"));
        assert!(alert.dismissible);
        assert!(alert.render().expect("renders").contains("alert-notice"));
    }

    #[test]
    fn button_requires_label() {
        let result = Button::build("Shared::Button".to_string(), args(json!({})));
        let Err(DomainError::InvalidArguments { message, .. }) = result else {
            panic!("expected invalid arguments");
        };
        assert_eq!(message, "`label` is required");
    }

    #[test]
    fn button_with_href_renders_a_link() {
        let component = Button::build(
            "Shared::Button".to_string(),
            args(json!({"label": "Edit", "href": "/books/1/edit", "variant": "secondary"})),
        )
        .expect("builds");

        let html = component.render().expect("renders");
        assert!(html.starts_with("<a "));
        assert!(html.contains("href="));
        assert!(html.contains("edit"));
        assert!(html.contains("btn btn-secondary"));
    }

    #[test]
    fn unlabelled_icons_are_hidden() {
        let component = Icon::build("Shared::Icon".to_string(), args(json!({"name": "trash"})))
            .expect("builds");
        let html = component.render().expect("renders");
        assert!(html.contains("aria-hidden=\"true\""));
        assert!(html.contains("icon-trash"));
    }

    #[test]
    fn table_reads_object_rows_by_column() {
        let component = Table::build(
            "Shared::Table".to_string(),
            args(json!({
                "columns": ["Title", "Year"],
                "rows": [{"title": "Dune", "year": 1965}, ["Emma", 1815]]
            })),
        )
        .expect("builds");

        let table = downcast::<Table>(&component);
        assert_eq!(table.rows[0].cells, vec!["Dune", "1965"]);
        assert_eq!(table.rows[1].cells, vec!["Emma", "1815"]);
        assert!(component.render().expect("renders").contains("<td>Dune</td>"));
    }

    #[test]
    fn table_falls_back_to_array_results() {
        let mut table_args = args(json!({"columns": ["Title"]}));
        table_args.insert(
            "result",
            Assign::Result(Outcome::success(json!([{"title": "Dune"}]))),
        );

        let component = Table::build("Shared::Table".to_string(), table_args).expect("builds");
        assert_eq!(downcast::<Table>(&component).rows.len(), 1);
    }

    #[test]
    fn empty_table_shows_message() {
        let component = Table::build(
            "Shared::Table".to_string(),
            args(json!({"columns": ["Title"], "empty_message": "No books yet"})),
        )
        .expect("builds");
        assert!(component.render().expect("renders").contains("No books yet"));
    }

    #[test]
    fn missing_view_lists_every_path() {
        let component = MissingView::build(
            "Shared::Views::MissingView".to_string(),
            args(json!({
                "expected_page": "View::Books::Publish",
                "view_paths": ["View::Books::Publish", "View::Pages::Books::PublishPage"]
            })),
        )
        .expect("builds");

        let html = component.render().expect("renders");
        assert!(html.contains("View::Books::Publish"));
        assert!(html.contains("View::Pages::Books::PublishPage"));
    }

    #[test]
    fn page_layout_is_a_layout() {
        let mut layout_args = args(json!({"content": "<main>Hi</main>"}));
        layout_args.push(Assign::Result(
            Outcome::success(json!({})).with_metadata("title", "Books"),
        ));

        let component =
            PageLayout::build("Shared::PageLayout".to_string(), layout_args).expect("builds");
        assert!(component.is_layout());

        let html = component.render().expect("renders");
        assert!(html.contains("<title>Books</title>"));
        assert!(html.contains("<main>Hi</main>"));
    }
}
