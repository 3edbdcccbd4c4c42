//! Schema error types
//!
//! Error codes:
//! - GOODS_SCHEMA_NOT_FOUND (FATAL)
//! - GOODS_SCHEMA_MALFORMED (FATAL)
//!
//! Both are configuration faults raised while loading schemas. A document
//! that fails validation is not an error of this module; it is reported as
//! a list of [`ValidationError`](super::ValidationError) values.

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// No schema resource exists under the requested name
    GoodsSchemaNotFound,
    /// Schema resource is not valid JSON or not a well-formed schema
    GoodsSchemaMalformed,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::GoodsSchemaNotFound => "GOODS_SCHEMA_NOT_FOUND",
            SchemaErrorCode::GoodsSchemaMalformed => "GOODS_SCHEMA_MALFORMED",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Schema name if applicable
    schema_name: Option<String>,
}

impl SchemaError {
    /// Create a schema not found error
    pub fn not_found(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: SchemaErrorCode::GoodsSchemaNotFound,
            message: format!("Schema '{}' not found", name),
            schema_name: Some(name),
        }
    }

    /// Create an error for a malformed schema resource
    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: SchemaErrorCode::GoodsSchemaMalformed,
            message: format!("Malformed schema '{}': {}", name, reason.into()),
            schema_name: Some(name),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the schema name if applicable
    pub fn schema_name(&self) -> Option<&str> {
        self.schema_name.as_deref()
    }

    /// Schema errors are configuration faults: the process must not serve
    /// requests with a schema it could not load.
    pub fn is_fatal(&self) -> bool {
        true
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[FATAL] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SchemaErrorCode::GoodsSchemaNotFound.code(), "GOODS_SCHEMA_NOT_FOUND");
        assert_eq!(SchemaErrorCode::GoodsSchemaMalformed.code(), "GOODS_SCHEMA_MALFORMED");
    }

    #[test]
    fn test_not_found_carries_name() {
        let err = SchemaError::not_found("create-record");
        assert_eq!(err.code(), SchemaErrorCode::GoodsSchemaNotFound);
        assert_eq!(err.schema_name(), Some("create-record"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_display_includes_code_and_reason() {
        let err = SchemaError::malformed("update-record", "Invalid JSON: EOF");
        let display = format!("{}", err);
        assert!(display.contains("FATAL"));
        assert!(display.contains("GOODS_SCHEMA_MALFORMED"));
        assert!(display.contains("Invalid JSON"));
    }
}
