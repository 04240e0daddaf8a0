use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::http::StatusCode;
use serde_json::json;
use viewkit::application::dispatch::{RenderDispatcher, RenderOptions, ViewResponder};
use viewkit::application::registry::{ClassRegistry, ComponentRegistry};
use viewkit::application::resolver::{ApplicationRoot, ViewResolver};
use viewkit::domain::component::{
    Component, ComponentClass, ComponentClassFn, ComponentNamespace, ComponentRef, ConstructArgs,
    ConstructorShape,
};
use viewkit::domain::error::ComponentRenderError;
use viewkit::domain::library::{ConventionalViews, LibraryHandle};
use viewkit::domain::naming::canonicalize;
use viewkit::domain::outcome::Outcome;
use viewkit::presentation::{self, components::MissingView};

#[derive(Debug)]
struct BookPage {
    path: String,
    args: ConstructArgs,
}

impl Component for BookPage {
    fn class_path(&self) -> &str {
        &self.path
    }

    fn render(&self) -> Result<String, ComponentRenderError> {
        Ok(format!("<article data-view=\"{}\"></article>", self.path))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn page_class(path: &str) -> ComponentRef {
    let owned = path.to_string();
    ComponentClassFn::new(path, ConstructorShape::Positional, move |args| {
        Ok(Arc::new(BookPage {
            path: owned.clone(),
            args,
        }) as Arc<dyn Component>)
    })
    .into_ref()
}

/// Counts existence probes made during resolution.
struct CountingRegistry {
    inner: ComponentRegistry,
    probes: AtomicUsize,
}

impl ClassRegistry for CountingRegistry {
    fn class_exists(&self, path: &str) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.inner.class_exists(path)
    }

    fn resolve_class(&self, path: &str) -> Option<ComponentRef> {
        self.inner.resolve_class(path)
    }
}

fn resolver_over(registry: Arc<dyn ClassRegistry>) -> ViewResolver {
    ViewResolver::builder(registry)
        .application(ApplicationRoot::direct(ConventionalViews::new("View")))
        .library(LibraryHandle::with_views(
            "WebhooksEngine",
            ConventionalViews::new("Webhooks::View"),
        ))
        .components_namespace(ComponentNamespace::new("Shared"))
        .build()
        .expect("resolver builds")
}

#[test]
fn canonical_names_round_trip() {
    for name in [
        "Books",
        "Scoped::Books",
        "FindBySlug",
        "Webhooks::Outbound::Retry",
        "View::Pages::Books::PublishPage",
    ] {
        assert_eq!(canonicalize(name), name);
        assert_eq!(canonicalize(&canonicalize(name)), canonicalize(name));
    }

    assert_eq!(canonicalize("scoped/books"), "Scoped::Books");
    assert_eq!(canonicalize("find by slug"), "FindBySlug");
}

#[test]
fn application_view_wins_regardless_of_registration_order() {
    let paths = [
        "View::Pages::Books::PublishPage",
        "Shared::Views::Books::Publish",
        "View::Books::Publish",
    ];

    for rotation in 0..paths.len() {
        let registry = Arc::new(ComponentRegistry::new());
        for offset in 0..paths.len() {
            registry.register(page_class(paths[(rotation + offset) % paths.len()]));
        }

        let resolved = resolver_over(registry)
            .resolve("publish", "books")
            .expect("resolves");
        assert_eq!(resolved.path(), "View::Books::Publish");
    }
}

#[test]
fn repeated_resolution_searches_once_until_cleared() {
    let registry = Arc::new(CountingRegistry {
        inner: ComponentRegistry::new(),
        probes: AtomicUsize::new(0),
    });
    registry.inner.register(page_class("Shared::Views::Books::Publish"));
    let resolver = resolver_over(registry.clone());

    let first = resolver.resolve("publish", "books").expect("resolves");
    let searched = registry.probes.load(Ordering::SeqCst);
    let second = resolver.resolve("publish", "books").expect("resolves");

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.probes.load(Ordering::SeqCst), searched);

    let replacement = page_class("View::Books::Publish");
    registry.inner.register(Arc::clone(&replacement));
    resolver.clear();

    let third = resolver.resolve("publish", "books").expect("resolves");
    assert!(Arc::ptr_eq(&third, &replacement));
}

#[test]
fn library_owns_its_controllers() {
    let resolver = resolver_over(Arc::new(ComponentRegistry::new()));

    let (library, scope) = resolver.split_controller("webhooks/outbound");
    let library = library.expect("library claims controller");

    assert_eq!(library.handle().name(), "WebhooksEngine");
    assert_eq!(library.short_name(), "Webhooks");
    assert_eq!(scope, "Outbound");
}

#[test]
fn candidate_paths_for_library_controller() {
    let resolver = resolver_over(Arc::new(ComponentRegistry::new()));

    insta::assert_snapshot!(
        resolver.candidate_paths("retry", "webhooks/outbound").join("\n"),
        @r"
    View::Webhooks::Outbound::Retry
    Webhooks::View::Outbound::Retry
    Shared::Views::Webhooks::Outbound::Retry
    Webhooks::View::Pages::Outbound::RetryPage
    "
    );
}

#[test]
fn unresolvable_action_yields_none() {
    let resolver = resolver_over(Arc::new(ComponentRegistry::new()));
    assert!(resolver.resolve("publish", "books").is_none());
    assert_eq!(resolver.cached_len(), 0);
}

#[test]
fn publish_renders_application_view() {
    let registry = Arc::new(ComponentRegistry::new());
    registry.register(page_class("View::Books::Publish"));
    let dispatcher = RenderDispatcher::new(Arc::new(resolver_over(registry)), "books", "publish");
    let outcome = Outcome::success(json!({"book": {"id": 7, "title": "Dune"}}));

    let response = dispatcher
        .render_result(outcome.clone(), RenderOptions::new())
        .expect("renders");

    let page = response.downcast::<BookPage>().expect("book page");
    assert_eq!(page.path, "View::Books::Publish");
    assert_eq!(page.args.result(ConstructorShape::Positional), Some(&outcome));
    assert_eq!(response.assigns.result(), Some(&outcome));
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.render_body().expect("markup"),
        "<article data-view=\"View::Books::Publish\"></article>"
    );
}

#[test]
fn missing_view_lists_the_tried_paths() {
    let registry = Arc::new(ComponentRegistry::new());
    let namespace = ComponentNamespace::new("Shared").expect("namespace");
    presentation::register_defaults(&registry, &namespace);

    let resolver = Arc::new(resolver_over(registry));
    let expected = resolver.view_paths("publish", "books");
    let responder = ViewResponder::new(RenderDispatcher::new(resolver, "books", "publish"));

    let response = responder
        .render_result(json!({}), RenderOptions::new())
        .expect("falls back to the missing view");

    let missing = response.downcast::<MissingView>().expect("missing view");
    assert_eq!(missing.class_path, "Shared::Views::MissingView");
    assert_eq!(missing.expected_page, expected[0]);
    assert_eq!(missing.view_paths, expected);
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

    let html = response.render_body().expect("markup");
    assert!(html.contains("<h1>View Not Found</h1>"));
    for path in &expected {
        assert!(html.contains(path.as_str()), "{path} missing from page");
    }
}

#[test]
fn underscored_entries_are_lifted_into_assigns() {
    let registry = Arc::new(ComponentRegistry::new());
    registry.register(page_class("View::Books::Publish"));
    let dispatcher = RenderDispatcher::new(Arc::new(resolver_over(registry)), "books", "publish");
    let outcome = Outcome::success(json!({
        "book": {"id": 7},
        "_page": {"title": "X"}
    }));

    let response = dispatcher
        .render_result(outcome.clone(), RenderOptions::new())
        .expect("renders");

    assert_eq!(response.assigns.value("page"), Some(&json!({"title": "X"})));
    assert_eq!(response.assigns.result(), Some(&outcome));
    assert!(!response.assigns.contains_key("_page"));
}
