use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the viewkit binary.
#[derive(Debug, Parser)]
#[command(
    name = "viewkit",
    version,
    about = "Inspect how viewkit resolves controller actions to view components"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "VIEWKIT_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,

    /// Override the shared components namespace.
    #[arg(long = "components-namespace", value_name = "NAMESPACE", global = true)]
    pub components_namespace: Option<String>,

    /// Override the namespace of the application's own views.
    #[arg(long = "application-views", value_name = "NAMESPACE", global = true)]
    pub application_view_namespace: Option<String>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Print the canonical class-path form of each name.
    Canonicalize(CanonicalizeArgs),
    /// Print the candidate view paths for an action, in probe order.
    Paths(PathsArgs),
    /// Print the library owning a controller and the controller's scope name.
    Split(SplitArgs),
    /// Render an action's result with the stock components and print the markup.
    Render(RenderArgs),
    /// List the stock components registered under the components namespace.
    Components,
}

#[derive(Debug, Args, Clone)]
pub struct CanonicalizeArgs {
    /// Treat dots as scope separators (`forms.text_field`).
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub dotted: bool,

    #[arg(value_name = "NAME", required = true)]
    pub names: Vec<String>,
}

#[derive(Debug, Args, Clone)]
pub struct PathsArgs {
    #[arg(value_name = "ACTION")]
    pub action: String,

    #[arg(value_name = "CONTROLLER")]
    pub controller: String,

    /// Also report which candidate resolves against the stock components.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub resolve: bool,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[arg(value_name = "ACTION")]
    pub action: String,

    #[arg(value_name = "CONTROLLER")]
    pub controller: String,

    /// JSON value the action produced.
    #[arg(long, value_name = "JSON")]
    pub data: Option<String>,

    /// Render the result as a failed outcome.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub failure: bool,
}

#[derive(Debug, Args, Clone)]
pub struct SplitArgs {
    #[arg(value_name = "CONTROLLER")]
    pub controller: String,
}
