//! CLI module
//!
//! Provides command-line interface for:
//! - serve: load configuration and schemas, then serve HTTP
//! - validate: check one JSON document against a request schema

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{run, run_command, serve, validate};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_document, write_json};
