//! CLI argument definitions using clap
//!
//! Commands:
//! - committee-api init --config <path>
//! - committee-api serve --config <path> [--port <port>]
//! - committee-api verify --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Committee governance API with slot accounting
#[derive(Parser, Debug)]
#[command(name = "committee-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database schema
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./committee-api.json")]
        config: PathBuf,
    },

    /// Run the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./committee-api.json")]
        config: PathBuf,

        /// Override `http.port` from the configuration
        #[arg(long)]
        port: Option<u16>,
    },

    /// Compare every committee's total slots with its slot rows
    Verify {
        /// Path to configuration file
        #[arg(long, default_value = "./committee-api.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
