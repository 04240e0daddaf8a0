use std::{process, sync::Arc};

use serde_json::Value;
use tracing::{Dispatch, Level, debug, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;
use viewkit::{
    application::{
        dispatch::{RenderDispatcher, RenderResponse, ViewResponder},
        error::{AppError, RenderError},
        registry::ComponentRegistry,
        resolver::ViewResolver,
    },
    config::{self, CanonicalizeArgs, PathsArgs, RenderArgs, Settings, SplitArgs},
    domain::{
        naming::{canonicalize, canonicalize_dotted},
        outcome::{ErrorKind, Outcome, OutcomeError},
    },
    infra::{error::InfraError, telemetry},
    presentation,
};

fn main() {
    if let Err(error) = run() {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli().map_err(|err| {
        InfraError::configuration(format!("failed to load configuration: {err}"))
    })?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match cli_args.command {
        config::Command::Canonicalize(args) => run_canonicalize(args),
        config::Command::Paths(args) => run_paths(&settings, args),
        config::Command::Split(args) => run_split(&settings, args),
        config::Command::Render(args) => run_render(&settings, args),
        config::Command::Components => run_components(&settings),
    }
}

fn run_canonicalize(args: CanonicalizeArgs) -> Result<(), AppError> {
    for name in &args.names {
        let canonical = if args.dotted {
            canonicalize_dotted(name)
        } else {
            canonicalize(name)
        };
        println!("{canonical}");
    }
    Ok(())
}

fn run_paths(settings: &Settings, args: PathsArgs) -> Result<(), AppError> {
    let (_, resolver) = build_resolver(settings)?;

    for path in resolver.view_paths(&args.action, &args.controller) {
        println!("{path}");
    }

    if args.resolve {
        match resolver.resolve(&args.action, &args.controller) {
            Some(class) => println!("resolved: {}", class.path()),
            None => println!("resolved: none"),
        }
    }
    Ok(())
}

fn run_split(settings: &Settings, args: SplitArgs) -> Result<(), AppError> {
    let (_, resolver) = build_resolver(settings)?;
    let (library, scope) = resolver.split_controller(&args.controller);

    match library {
        Some(library) => println!(
            "library: {} ({})",
            library.handle().name(),
            library.short_name()
        ),
        None => println!("library: none"),
    }
    println!("scope: {scope}");
    Ok(())
}

fn run_render(settings: &Settings, args: RenderArgs) -> Result<(), AppError> {
    let (_, resolver) = build_resolver(settings)?;

    let data = match args.data.as_deref() {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|err| AppError::validation(format!("--data is not valid JSON: {err}")))?,
        None => Value::Null,
    };
    let outcome = if args.failure {
        Outcome::failure(OutcomeError::new(ErrorKind::Unexpected, "rendered as failure"))
            .with_value(data)
    } else {
        Outcome::success(data)
    };

    let dispatcher = RenderDispatcher::new(Arc::new(resolver), &args.controller, &args.action);
    let options = settings.views.render_options();
    let response = if settings.views.missing_view {
        ViewResponder::new(dispatcher).respond(outcome, options)?
    } else {
        dispatcher.respond(outcome, options)?
    };

    print_response(&response)
}

fn print_response(response: &RenderResponse) -> Result<(), AppError> {
    let body = response.render_body().map_err(RenderError::from)?;
    info!(
        status = %response.status,
        layout = ?response.layout,
        assigns = response.assigns.len(),
        "Rendered response"
    );
    println!("{body}");
    Ok(())
}

fn run_components(settings: &Settings) -> Result<(), AppError> {
    let (registry, _) = build_resolver(settings)?;
    for path in registry.paths() {
        println!("{path}");
    }
    Ok(())
}

/// Registry holding the stock components, and a resolver over it.
fn build_resolver(settings: &Settings) -> Result<(Arc<ComponentRegistry>, ViewResolver), AppError> {
    let registry = Arc::new(ComponentRegistry::new());
    match settings.views.components_namespace.as_ref() {
        Some(namespace) => {
            presentation::register_defaults(&registry, namespace);
        }
        None => debug!("No components namespace configured; stock components are unavailable"),
    }

    let resolver = settings
        .resolver_builder(registry.clone())
        .build()?;
    Ok((registry, resolver))
}
