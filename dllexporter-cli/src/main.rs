mod app;
mod output;

use std::{path::Path, process::ExitCode};

use anyhow::Context;
use clap::Parser;
use dllexporter::{export::ExportFormat, Session};
use log::warn;

use crate::app::Cli;

fn main() -> ExitCode {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .expect("failed to set Ctrl+C handler");

    let cli = Cli::parse();

    let Some(path) = cli.path.as_deref() else {
        output::print_usage();
        return ExitCode::SUCCESS;
    };

    // dllexporter info+ on stderr; --verbose enables debug; RUST_LOG overrides
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_module("dllexporter", level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .init();

    let outcome = run(path, &cli);
    if let Err(error) = &outcome {
        output::print_failure(error);
    }
    output::print_completion();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

fn run(path: &Path, cli: &Cli) -> anyhow::Result<()> {
    let format = cli.format.parse::<ExportFormat>().unwrap_or_default();

    let session = cli
        .search_paths
        .iter()
        .fold(Session::builder(), |builder, dir| builder.search_path(dir.clone()))
        .open(path)
        .with_context(|| format!("failed to load assembly: {}", path.display()))?;

    if session.diagnostics().has_any() {
        warn!("{}", session.diagnostics().summary());
    }

    let document = session
        .render(format)
        .with_context(|| format!("failed to render {format} export"))?;

    // an empty OUTPUT argument means standard output
    match cli.output.as_deref().filter(|path| !path.as_os_str().is_empty()) {
        Some(output) => output::write_export(output, &document)?,
        None => println!("{document}"),
    }
    Ok(())
}
