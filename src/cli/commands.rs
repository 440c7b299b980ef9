//! CLI command implementations
//!
//! Each command loads the configuration, opens the configured record store
//! and runs to completion. Only `serve` keeps running.

use std::path::Path;
use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::aggregation::{dedup, summarize, RecordFilter, SummaryStats};
use crate::config::AppConfig;
use crate::http_server::{open_store, AppState, HttpServer};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::records::RecordStore;
use crate::sources::{Ingestor, RefreshReport};

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::write_json;

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
        Command::Serve { config } => serve(&config),
        Command::Refresh { config } => {
            let report = refresh(&config)?;
            write_json(&report)
        }
        Command::Summary {
            config,
            year,
            crop,
            region,
        } => {
            let filter = summary_filter(year, crop, region);
            let stats = summary(&config, &filter)?;
            write_json(&stats)
        }
    }
}

fn load_config(config_path: &Path) -> CliResult<AppConfig> {
    log_event_with_fields(
        Event::BootStart,
        &[("config", config_path.display().to_string().as_str())],
    );
    Ok(AppConfig::load(Some(config_path))?)
}

fn runtime() -> CliResult<Runtime> {
    Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))
}

/// Start the HTTP server
///
/// With `refresh_on_start` the store is filled from the sources before the
/// listener binds.
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let state = Arc::new(AppState::from_config(&config)?);
    let rt = runtime()?;

    rt.block_on(async move {
        if config.ingestion.refresh_on_start {
            state.ingestor.refresh(state.store.as_ref()).await?;
        } else {
            log_event(Event::RefreshSkipped);
        }

        HttpServer::new(config.server.clone(), state)
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))?;
        Ok::<(), CliError>(())
    })
}

/// Run one ingestion cycle into the configured store
pub fn refresh(config_path: &Path) -> CliResult<RefreshReport> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;
    let ingestor = Ingestor::standard(config.ingestion.source_config());

    let rt = runtime()?;
    Ok(rt.block_on(ingestor.refresh(store.as_ref()))?)
}

/// Summary statistics over the stored records matching `filter`
pub fn summary(config_path: &Path, filter: &RecordFilter) -> CliResult<Option<SummaryStats>> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;
    summarize_store(store.as_ref(), filter)
}

fn summary_filter(year: Option<String>, crop: Option<String>, region: Option<String>) -> RecordFilter {
    let mut filter = RecordFilter::new();
    if let Some(year) = year {
        filter = filter.year(year);
    }
    if let Some(crop) = crop {
        filter = filter.crop(crop);
    }
    if let Some(region) = region {
        filter = filter.region(region);
    }
    filter
}

fn summarize_store(store: &dyn RecordStore, filter: &RecordFilter) -> CliResult<Option<SummaryStats>> {
    let records = filter.apply(dedup(store.all()?));
    Ok(summarize(&records))
}
