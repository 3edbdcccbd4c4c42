//! CLI command implementations
//!
//! `serve` boots in a fixed order:
//! 1. Configuration load
//! 2. Logging
//! 3. Schema load (every request schema, so a bad deployment fails here)
//! 4. HTTP listener bind
//!
//! `validate` runs the schema validator over one document offline.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tokio::net::TcpListener;

use crate::observability::{self, Event, ObservabilityErrorCode};
use crate::records::InMemoryRecordStore;
use crate::rest_api::{GoodsItemHandler, RestServer};
use crate::schema::{self, SchemaCache, SchemaLoader};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_document, write_json};

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
        Command::Serve { config } => serve(config.as_deref()),
        Command::Validate {
            config,
            schema,
            document,
        } => validate(config.as_deref(), &schema, &document),
    }
}

/// Start the HTTP server
pub fn serve(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::load_or_default(config_path)?;

    match observability::init_logging(&config.log_filter) {
        Ok(()) => {}
        // A subscriber installed by an embedding process keeps receiving events.
        Err(e) if e.code() == ObservabilityErrorCode::SubscriberInitFailed => {}
        Err(e) => return Err(CliError::config_error(e.to_string())),
    }
    tracing::info!(event = %Event::BootStart, version = env!("CARGO_PKG_VERSION"));
    tracing::info!(
        event = %Event::ConfigLoaded,
        addr = %config.socket_addr(),
        schema_dir = %config.schema_dir.display()
    );

    let schemas = Arc::new(SchemaCache::new(SchemaLoader::new(&config.schema_dir)));
    schemas.preload()?;

    let store = Arc::new(InMemoryRecordStore::new());
    let handler = GoodsItemHandler::new(schemas, store, config.page_limits()?);
    let server = RestServer::new(handler).with_cors_origins(config.cors_origins.clone());

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let listener = TcpListener::bind(config.socket_addr())
            .await
            .map_err(|e| {
                CliError::boot_failed(format!("Failed to bind {}: {}", config.socket_addr(), e))
            })?;
        server
            .serve(listener)
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Validate one document and print its flattened violations.
///
/// Prints `{"valid": bool, "errors": [{location, message}...]}`; an invalid
/// document is also reported as an error so the exit status is non-zero.
pub fn validate(config_path: Option<&Path>, schema_name: &str, document: &Path) -> CliResult<()> {
    let config = Config::load_or_default(config_path)?;
    let schema = SchemaLoader::new(&config.schema_dir).load(schema_name)?;
    let value = read_document(document)?;

    let errors = schema::validate(&schema, &value);
    write_json(&json!({
        "valid": errors.is_empty(),
        "errors": errors,
    }))?;

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CliError::document_invalid(errors.len()))
    }
}
