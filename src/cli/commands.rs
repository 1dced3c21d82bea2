//! CLI command implementations
//!
//! Each command loads the configuration, applies its log level, and builds
//! its own tokio runtime. Results are written to stdout as JSON.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::http_server::{AppState, HttpServer};
use crate::observability::{log_event, log_event_with_fields, Event, Logger};
use crate::slots::verify_totals;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
        Command::Verify { config } => verify(&config),
    }
}

/// Create the schema in the configured database.
///
/// Idempotent: running it against an initialized database changes nothing.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let db = config.database.open();

    runtime()?.block_on(db.ensure_schema())?;

    write_response(&json!({
        "initialized": true,
        "database": db.location().describe(),
    }))
}

/// Boot the store and serve HTTP until interrupted
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    log_event(Event::BootStart);

    let result = boot_and_serve(config_path, port);
    if let Err(e) = &result {
        log_event_with_fields(
            Event::BootFailed,
            &[("code", e.code_str()), ("reason", e.message())],
        );
    }
    result
}

fn boot_and_serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }

    let db = Arc::new(config.database.open());
    let rt = runtime()?;

    rt.block_on(async move {
        db.ensure_schema().await?;

        let state = Arc::new(AppState::new(db, config.slots.clone()));
        let server = HttpServer::with_config(config.http.clone(), state);
        let addr = server.socket_addr();
        log_event_with_fields(Event::BootComplete, &[("addr", addr.as_str())]);

        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Report committees whose total slots disagree with their slot rows.
///
/// Fails with `COMMITTEE_CLI_CONSISTENCY_DRIFT` when any committee drifts.
pub fn verify(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let db = config.database.open();

    let report = runtime()?.block_on(async {
        db.ensure_schema().await?;
        verify_totals(&db).await
    })?;

    write_response(&report)?;

    if report.is_consistent() {
        Ok(())
    } else {
        Err(CliError::consistency_drift(
            report.drift.len(),
            report.committees_checked,
        ))
    }
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);

    let path = config_path.display().to_string();
    let database = config.database.location().describe();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("config", path.as_str()),
            ("database", database.as_str()),
            ("aggregate_mode", config.slots.aggregate_mode.as_str()),
        ],
    );
    Ok(config)
}

fn runtime() -> CliResult<Runtime> {
    Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}
