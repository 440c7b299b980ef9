//! CLI module for agridash
//!
//! Provides command-line interface for:
//! - serve: Start the HTTP API server
//! - refresh: One ingestion cycle into the configured store
//! - summary: Summary statistics as JSON

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{refresh, run, run_command, serve, summary};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_json, write_json_to};
