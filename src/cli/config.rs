//! Configuration file
//!
//! A JSON object; every field is optional:
//!
//! ```json
//! {
//!   "host": "0.0.0.0",
//!   "port": 8080,
//!   "schema_dir": "./schemas",
//!   "default_page_size": 500,
//!   "max_page_size": 500,
//!   "log_filter": "info",
//!   "cors_origins": []
//! }
//! ```

use std::fs;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::rest_api::PageLimits;

use super::errors::{CliError, CliResult};

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding `<name>.json` request schemas (default: "./schemas")
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,

    /// Listing page size when `size` is absent (default: 500)
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Largest accepted listing page size (default: 500)
    #[serde(default = "default_page_size")]
    pub max_page_size: u64,

    /// `tracing` filter directive (default: "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("./schemas")
}

fn default_page_size() -> u64 {
    500
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            schema_dir: default_schema_dir(),
            default_page_size: default_page_size(),
            max_page_size: default_page_size(),
            log_filter: default_log_filter(),
            cors_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Loads the file if given, otherwise validated defaults.
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.host.trim().is_empty() {
            return Err(CliError::config_error("host must not be empty"));
        }

        self.page_limits()?;

        EnvFilter::try_new(&self.log_filter)
            .map_err(|e| {
                CliError::config_error(format!("Invalid log_filter '{}': {}", self.log_filter, e))
            })?;

        Ok(())
    }

    /// Page size bounds for listing requests
    pub fn page_limits(&self) -> CliResult<PageLimits> {
        let default_size = NonZeroU64::new(self.default_page_size)
            .ok_or_else(|| CliError::config_error("default_page_size must be > 0"))?;
        let max_size = NonZeroU64::new(self.max_page_size)
            .ok_or_else(|| CliError::config_error("max_page_size must be > 0"))?;

        if default_size > max_size {
            return Err(CliError::config_error(format!(
                "default_page_size {} exceeds max_page_size {}",
                default_size, max_size
            )));
        }

        Ok(PageLimits {
            default_size,
            max_size,
        })
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_config(temp_dir: &TempDir, value: serde_json::Value) -> PathBuf {
        let path = temp_dir.path().join("store.json");
        fs::write(&path, value.to_string()).unwrap();
        path
    }

    #[test]
    fn test_config_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({}));

        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
        assert_eq!(config.page_limits().unwrap(), PageLimits::default());
    }

    #[test]
    fn test_config_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            json!({
                "port": 9000,
                "default_page_size": 25,
                "max_page_size": 100,
                "log_filter": "debug"
            }),
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.port, 9000);
        let limits = config.page_limits().unwrap();
        assert_eq!(limits.default_size.get(), 25);
        assert_eq!(limits.max_size.get(), 100);
    }

    #[test]
    fn test_config_validates_page_sizes() {
        let temp_dir = TempDir::new().unwrap();

        let zero = write_config(&temp_dir, json!({"max_page_size": 0}));
        assert!(Config::load(&zero).is_err());

        let inverted =
            write_config(&temp_dir, json!({"default_page_size": 600, "max_page_size": 500}));
        assert!(Config::load(&inverted).is_err());
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({"data_dir": "/tmp"}));
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_config_rejects_bad_log_filter() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, json!({"log_filter": "goods_item_store=verbose"}));
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(err.message().contains("Failed to read config"));
    }
}
