//! Observable events
//!
//! Every structured log line carries an `event` field holding one of these
//! names. Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Listener bound, ready to serve
    Serving,
    /// Server stopped
    ShutdownComplete,

    // Configuration
    /// Configuration loaded
    ConfigLoaded,
    /// One schema parsed
    SchemaLoaded,
    /// All request schemas loaded
    SchemasLoaded,

    // Requests
    /// Request body rejected by schema validation
    ValidationFailed,
    /// Request failed with a server-side error
    RequestFailed,

    // Records
    RecordCreated,
    RecordUpdated,
    RecordRemoved,
    RecordsListed,

    // Accreditation & review
    AccreditationRequested,
    AccreditationDecided,
    ReviewFlagged,
    ReviewResolved,

    // Profiles
    ProfileMaintained,
}

impl Event {
    /// Every event, in declaration order
    pub const ALL: [Event; 17] = [
        Event::BootStart,
        Event::Serving,
        Event::ShutdownComplete,
        Event::ConfigLoaded,
        Event::SchemaLoaded,
        Event::SchemasLoaded,
        Event::ValidationFailed,
        Event::RequestFailed,
        Event::RecordCreated,
        Event::RecordUpdated,
        Event::RecordRemoved,
        Event::RecordsListed,
        Event::AccreditationRequested,
        Event::AccreditationDecided,
        Event::ReviewFlagged,
        Event::ReviewResolved,
        Event::ProfileMaintained,
    ];

    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            // Boot & Lifecycle
            Event::BootStart => "STARTUP_BEGIN",
            Event::Serving => "SERVING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            // Configuration
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",

            // Requests
            Event::ValidationFailed => "VALIDATION_FAILED",
            Event::RequestFailed => "REQUEST_FAILED",

            // Records
            Event::RecordCreated => "RECORD_CREATED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordRemoved => "RECORD_REMOVED",
            Event::RecordsListed => "RECORDS_LISTED",

            // Accreditation & review
            Event::AccreditationRequested => "ACCREDITATION_REQUESTED",
            Event::AccreditationDecided => "ACCREDITATION_DECIDED",
            Event::ReviewFlagged => "REVIEW_FLAGGED",
            Event::ReviewResolved => "REVIEW_RESOLVED",

            // Profiles
            Event::ProfileMaintained => "PROFILE_MAINTAINED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
