//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and reads the environment
//! - installs the tracing subscriber
//! - loads the dataset once
//! - serves the dashboard, or prints/exports one evaluation

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::cli::{Command, ExportArgs, ReportArgs, ServeArgs};
use crate::config::Settings;
use crate::domain::Selection;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `fxdash` binary.
pub fn run() -> Result<(), AppError> {
    // `fxdash` and `fxdash --port 9000` behave like `fxdash serve ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let mut settings = Settings::from_env()?;
    crate::logging::init_logger(&settings.log_filter)?;

    match cli.command {
        Command::Serve(args) => handle_serve(args, &mut settings),
        Command::Report(args) => handle_report(args, &mut settings),
        Command::Export(args) => handle_export(args, &mut settings),
    }
}

fn handle_serve(args: ServeArgs, settings: &mut Settings) -> Result<(), AppError> {
    args.data.apply(settings);
    if let Some(port) = args.port {
        settings.port = port;
    }

    let dataset = Arc::new(pipeline::load_dataset(settings)?);
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::runtime(format!("Failed to start async runtime: {e}")))?;
    runtime.block_on(crate::web::serve(settings.port, dataset))
}

fn handle_report(args: ReportArgs, settings: &mut Settings) -> Result<(), AppError> {
    args.data.apply(settings);
    let dataset = pipeline::load_dataset(settings)?;
    let selection = Selection::resolve(&args.selection.to_query(), &dataset);
    let view = pipeline::build_dashboard(&dataset, &selection);

    println!("{}", crate::report::format_run_summary(&dataset, &view));
    println!("{}", crate::report::format_text_block(&view.statistics));
    for block in &view.insights {
        println!("{}", crate::report::format_text_block(block));
    }
    let outcome = crate::builders::forecast::evaluate(&dataset.window(&selection), &selection);
    println!("{}", crate::report::format_forecast_summary(&outcome));

    Ok(())
}

fn handle_export(args: ExportArgs, settings: &mut Settings) -> Result<(), AppError> {
    args.data.apply(settings);
    let dataset = pipeline::load_dataset(settings)?;
    let selection = Selection::resolve(&args.selection.to_query(), &dataset);
    let view = pipeline::build_dashboard(&dataset, &selection);

    crate::io::export::write_dashboard_json(&args.out, &view)?;
    info!(path = %args.out.display(), "exported dashboard");
    Ok(())
}

/// Rewrite argv so `fxdash` defaults to `fxdash serve`.
///
/// Rules:
/// - `fxdash`                      -> `fxdash serve`
/// - `fxdash --port 9000 ...`      -> `fxdash serve --port 9000 ...`
/// - `fxdash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("serve".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "serve" | "report" | "export");
    if is_subcommand {
        return argv;
    }

    // A leading flag belongs to `serve`.
    if arg1.starts_with('-') {
        argv.insert(1, "serve".to_string());
        return argv;
    }

    argv
}
