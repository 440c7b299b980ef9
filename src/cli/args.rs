//! CLI argument definitions using clap
//!
//! Commands:
//! - agridash serve --config <path>
//! - agridash refresh --config <path>
//! - agridash summary --config <path> [--year Y] [--crop C] [--region R]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// agridash - Agricultural statistics dashboard backend
#[derive(Parser, Debug)]
#[command(name = "agridash")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Start the HTTP API server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./agridash.json")]
        config: PathBuf,
    },

    /// Run one ingestion cycle into the configured store
    Refresh {
        /// Path to configuration file
        #[arg(long, default_value = "./agridash.json")]
        config: PathBuf,
    },

    /// Print summary statistics for the stored records
    Summary {
        /// Path to configuration file
        #[arg(long, default_value = "./agridash.json")]
        config: PathBuf,

        /// Only records from this year
        #[arg(long)]
        year: Option<String>,

        /// Only records for this crop
        #[arg(long)]
        crop: Option<String>,

        /// Only records for this region
        #[arg(long)]
        region: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
