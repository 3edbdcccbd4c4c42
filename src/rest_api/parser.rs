//! # Query and Path Parser
//!
//! Parses listing query parameters and path segments. Anything that does
//! not parse is rejected here, before the handler runs.

use std::collections::HashMap;
use std::num::NonZeroU64;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use uuid::Uuid;

use super::errors::{RestError, RestResult};

/// Default page size if not specified
pub const DEFAULT_PAGE_SIZE: u64 = 500;

/// Maximum page size accepted
pub const MAX_PAGE_SIZE: u64 = 500;

/// Page size bounds applied to listing requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: NonZeroU64,
    pub max_size: NonZeroU64,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: NonZeroU64::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU64::MIN),
            max_size: NonZeroU64::new(MAX_PAGE_SIZE).unwrap_or(NonZeroU64::MIN),
        }
    }
}

/// Parsed listing parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Zero-based requested page (unclamped)
    pub page: u64,
    /// Records per page
    pub size: NonZeroU64,
    /// Only records updated at or after this instant
    pub last_updated_date: Option<DateTime<Utc>>,
}

impl ListParams {
    /// Parse query parameters from a HashMap
    pub fn parse(params: &HashMap<String, String>, limits: &PageLimits) -> RestResult<Self> {
        let mut result = ListParams {
            page: 0,
            size: limits.default_size,
            last_updated_date: None,
        };

        for (key, value) in params {
            match key.as_str() {
                "page" => {
                    result.page = parse_page(value)?;
                }
                "size" => {
                    result.size = parse_size(value)?;
                }
                "lastUpdatedDate" => {
                    result.last_updated_date = Some(parse_timestamp(value)?);
                }
                _ => {
                    return Err(RestError::InvalidQueryParam(format!("Unknown parameter: {}", key)));
                }
            }
        }

        // Enforce maximum page size
        if result.size > limits.max_size {
            return Err(RestError::InvalidQueryParam(format!(
                "size {} exceeds maximum {}",
                result.size, limits.max_size
            )));
        }

        Ok(result)
    }
}

/// Parse page parameter
fn parse_page(value: &str) -> RestResult<u64> {
    value
        .parse()
        .map_err(|_| RestError::InvalidQueryParam(format!("Invalid page: {}", value)))
}

/// Parse size parameter; zero is rejected
fn parse_size(value: &str) -> RestResult<NonZeroU64> {
    value
        .parse()
        .map_err(|_| RestError::InvalidQueryParam(format!("Invalid size: {}", value)))
}

/// Parse an RFC 3339 timestamp
fn parse_timestamp(value: &str) -> RestResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| RestError::InvalidQueryParam(format!("Invalid lastUpdatedDate: {}", value)))
}

/// Trader EORI: two letters then 12 to 15 alphanumerics, upper case
const EORI_PATTERN: &str = "^[A-Z]{2}[0-9A-Z]{12,15}$";

fn eori_regex() -> Option<&'static Regex> {
    static EORI: OnceLock<Option<Regex>> = OnceLock::new();
    EORI.get_or_init(|| Regex::new(EORI_PATTERN).ok()).as_ref()
}

/// Checks the trader EORI path segment.
pub fn parse_eori(value: &str) -> RestResult<String> {
    let pattern = eori_regex()
        .ok_or_else(|| RestError::Internal("EORI pattern failed to compile".into()))?;
    if !pattern.is_match(value) {
        return Err(RestError::InvalidPathParam(format!("Invalid EORI: {}", value)));
    }
    Ok(value.to_string())
}

/// Parse the record id path segment
pub fn parse_record_id(value: &str) -> RestResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RestError::InvalidPathParam(format!("Invalid recordId: {}", value)))
}
