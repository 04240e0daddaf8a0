use std::collections::HashMap;
use std::sync::Arc;

use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use serde_json::json;
use viewkit::application::dispatch::{RenderDispatcher, RenderOptions, ViewResponder};
use viewkit::application::registry::ComponentRegistry;
use viewkit::application::resolver::{ApplicationRoot, ViewResolver};
use viewkit::domain::component::{ComponentClassFn, ComponentNamespace, ConstructorShape};
use viewkit::domain::error::DomainError;
use viewkit::domain::library::ConventionalViews;
use viewkit::infra::telemetry;

#[test]
fn resolution_and_fallback_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");
    telemetry::describe_metrics();

    let registry = Arc::new(ComponentRegistry::new());
    registry.register(
        ComponentClassFn::new("View::Books::Index", ConstructorShape::Keyword, |_| {
            Err(DomainError::invalid_arguments("View::Books::Index", "probe only"))
        })
        .into_ref(),
    );
    let resolver = Arc::new(
        ViewResolver::builder(registry)
            .application(ApplicationRoot::direct(ConventionalViews::new("View")))
            .components_namespace(ComponentNamespace::new("Shared"))
            .build()
            .expect("resolver builds"),
    );

    // miss then hit
    assert!(resolver.resolve("index", "books").is_some());
    assert!(resolver.resolve("index", "books").is_some());

    // nothing registered for publish, and no missing-view component
    let responder = ViewResponder::new(RenderDispatcher::new(
        Arc::clone(&resolver),
        "books",
        "publish",
    ));
    let response = responder
        .render_result(json!({}), RenderOptions::new())
        .expect("falls back");
    assert_eq!(
        response.render_body().expect("markup"),
        "<h1>View Not Found</h1>"
    );

    let counters: HashMap<String, u64> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(composite_key, _, _, value)| match value {
            DebugValue::Counter(count) => Some((composite_key.key().name().to_string(), count)),
            _ => None,
        })
        .collect();

    let expected = [
        ("viewkit_resolver_cache_miss_total", 2),
        ("viewkit_resolver_cache_hit_total", 1),
        ("viewkit_resolver_not_found_total", 1),
        ("viewkit_render_fallback_total", 1),
    ];

    for (metric, count) in expected {
        assert_eq!(
            counters.get(metric).copied(),
            Some(count),
            "unexpected value for {metric}"
        );
    }
}
