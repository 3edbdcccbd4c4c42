//! Observability subsystem
//!
//! Structured JSON logging through `tracing`. Every line carries an
//! `event` field taken from [`Event`]:
//!
//! ```ignore
//! use goods_item_store::observability::Event;
//!
//! tracing::info!(event = %Event::RecordCreated, eori = "GB123456789012");
//! ```
//!
//! Observability is read-only: nothing here influences request handling.

mod events;

pub use events::Event;

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configured log filter
pub const LOG_ENV: &str = "GOODS_ITEM_LOG";

/// Observability error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservabilityErrorCode {
    /// Log filter directive does not parse
    InvalidLogFilter,
    /// A global subscriber is already installed
    SubscriberInitFailed,
}

impl ObservabilityErrorCode {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ObservabilityErrorCode::InvalidLogFilter => "OBSERVABILITY_INVALID_LOG_FILTER",
            ObservabilityErrorCode::SubscriberInitFailed => "OBSERVABILITY_INIT_FAILED",
        }
    }
}

impl fmt::Display for ObservabilityErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Observability error
#[derive(Debug)]
pub struct ObservabilityError {
    code: ObservabilityErrorCode,
    message: String,
}

impl ObservabilityError {
    fn new(code: ObservabilityErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ObservabilityErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ObservabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ObservabilityError {}

/// Builds the log filter: `GOODS_ITEM_LOG` wins over the configured
/// directive.
pub fn log_filter(configured: &str) -> Result<EnvFilter, ObservabilityError> {
    match EnvFilter::try_from_env(LOG_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(configured).map_err(|e| {
            ObservabilityError::new(
                ObservabilityErrorCode::InvalidLogFilter,
                format!("'{}': {}", configured, e),
            )
        }),
    }
}

/// Installs the global JSON subscriber.
pub fn init_logging(configured_filter: &str) -> Result<(), ObservabilityError> {
    let filter = log_filter(configured_filter)?;

    tracing_subscriber::fmt()
        .json()
        .with_current_span(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| {
            ObservabilityError::new(ObservabilityErrorCode::SubscriberInitFailed, e.to_string())
        })
}
