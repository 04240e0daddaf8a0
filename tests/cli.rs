use assert_cmd::Command;
use predicates::str::contains;
use std::io::Write;
use tempfile::NamedTempFile;

fn viewkit() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("viewkit"));
    cmd.env_remove("VIEWKIT_CONFIG_FILE")
        .env_remove("VIEWKIT__VIEWS__COMPONENTS_NAMESPACE")
        .env_remove("VIEWKIT__APPLICATION__VIEW_NAMESPACE")
        .env("RUST_LOG", "warn");
    cmd
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("tmp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn canonicalize_prints_class_paths() {
    viewkit()
        .args(["canonicalize", "find_by_slug", "scoped/books", "Scoped::Books"])
        .assert()
        .success()
        .stdout("FindBySlug\nScoped::Books\nScoped::Books\n");

    viewkit()
        .args(["canonicalize", "--dotted", "forms.text_field"])
        .assert()
        .success()
        .stdout("Forms::TextField\n");
}

#[test]
fn paths_lists_candidates_in_precedence_order() {
    viewkit()
        .args([
            "paths",
            "publish",
            "books",
            "--resolve",
            "--application-views",
            "View",
            "--components-namespace",
            "Shared",
        ])
        .assert()
        .success()
        .stdout(
            "View::Books::Publish\n\
             Shared::Views::Books::Publish\n\
             View::Pages::Books::PublishPage\n\
             resolved: none\n",
        );
}

#[test]
fn split_uses_configured_libraries() {
    let config = config_file(
        r#"
[[libraries]]
name = "WebhooksEngine"
view_namespace = "Webhooks::View"
"#,
    );

    viewkit()
        .arg("--config-file")
        .arg(config.path())
        .args(["split", "webhooks/outbound"])
        .assert()
        .success()
        .stdout("library: WebhooksEngine (Webhooks)\nscope: Outbound\n");

    viewkit()
        .arg("--config-file")
        .arg(config.path())
        .args(["split", "books"])
        .assert()
        .success()
        .stdout("library: none\nscope: Books\n");
}

#[test]
fn components_lists_stock_components() {
    viewkit()
        .args(["components", "--components-namespace", "Shared"])
        .assert()
        .success()
        .stdout(contains("Shared::Views::MissingView"))
        .stdout(contains("Shared::PageLayout"))
        .stdout(contains("Shared::Button"));
}

#[test]
fn render_falls_back_to_missing_view() {
    viewkit()
        .args([
            "render",
            "publish",
            "books",
            "--application-views",
            "View",
            "--components-namespace",
            "Shared",
        ])
        .assert()
        .success()
        .stdout(contains("<h1>View Not Found</h1>"))
        .stdout(contains("View::Books::Publish"))
        .stdout(contains("Shared::Views::Books::Publish"));
}

#[test]
fn render_rejects_invalid_data() {
    viewkit()
        .args([
            "render",
            "publish",
            "books",
            "--components-namespace",
            "Shared",
            "--data",
            "{not json",
        ])
        .assert()
        .failure()
        .stderr(contains("not valid JSON"));
}

#[test]
fn missing_config_file_fails_fast() {
    viewkit()
        .args(["--config-file", "/nonexistent/viewkit.toml", "components"])
        .assert()
        .failure()
        .stderr(contains("failed to load configuration"));
}
