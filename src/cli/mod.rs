//! CLI module for the committee API
//!
//! Provides command-line interface for:
//! - init: Create the database schema
//! - serve: Boot the store and run the HTTP server
//! - verify: Check committee totals against slot rows

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve, verify};
pub use errors::{CliError, CliErrorCode, CliResult};
