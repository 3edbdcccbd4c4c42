//! Schema validation subsystem
//!
//! Every mutating request body is checked against a draft-04 JSON Schema
//! before it may change stored state. Keyword evaluation, `format`
//! assertions included, is done by the `jsonschema` crate; this module
//! owns loading, the violation tree and its flattening.
//!
//! # Design Principles
//!
//! - Schemas are loaded once and shared read-only
//! - Validation is a pure function of (schema, document)
//! - Violations are built as a tree and flattened to leaves only
//! - Locations use the `$`-rooted dotted path convention

mod errors;
mod loader;
mod types;
mod validator;
mod violation;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::{SchemaCache, SchemaLoader};
pub use types::SchemaDefinition;
pub use validator::{evaluate, validate};
pub use violation::{normalize_pointer, ValidationError, Violation};

/// Schemas used by the stub's mutating endpoints, one per request type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestSchema {
    /// Body of `POST /traders/:eori/records`
    CreateRecord,
    /// Body of `PATCH /traders/:eori/records/:recordId`
    UpdateRecord,
    /// Query of `DELETE /traders/:eori/records/:recordId`
    RemoveRecord,
    /// Body of `PUT /traders/:eori`
    MaintainProfile,
    /// Body of an accreditation request
    RequestAccreditation,
    /// Body of an accreditation decision
    AccreditationDecision,
    /// Body of a review flag request
    Review,
    /// Query of a review resolution
    ResolveReview,
}

impl RequestSchema {
    /// Every request schema, in startup preload order.
    pub const ALL: [RequestSchema; 8] = [
        RequestSchema::CreateRecord,
        RequestSchema::UpdateRecord,
        RequestSchema::RemoveRecord,
        RequestSchema::MaintainProfile,
        RequestSchema::RequestAccreditation,
        RequestSchema::AccreditationDecision,
        RequestSchema::Review,
        RequestSchema::ResolveReview,
    ];

    /// Resource name of the schema (file stem under the schema directory).
    pub fn name(&self) -> &'static str {
        match self {
            RequestSchema::CreateRecord => "create-record",
            RequestSchema::UpdateRecord => "update-record",
            RequestSchema::RemoveRecord => "remove-record",
            RequestSchema::MaintainProfile => "maintain-profile",
            RequestSchema::RequestAccreditation => "request-accreditation",
            RequestSchema::AccreditationDecision => "accreditation-decision",
            RequestSchema::Review => "review",
            RequestSchema::ResolveReview => "resolve-review",
        }
    }
}
