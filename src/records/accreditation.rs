//! Accreditation workflow
//!
//! ```text
//! NotRequested --request--> Pending --approve--> Approved
//!                                   --reject---> Rejected
//! ```
//!
//! `Approved` and `Rejected` are final. The review flag is independent of
//! this state and lives on the record metadata.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Accreditation state of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccreditationStatus {
    #[default]
    NotRequested,
    Pending,
    Approved,
    Rejected,
}

/// Events driving the accreditation workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccreditationEvent {
    Request,
    Approve,
    Reject,
}

/// An event that does not apply to the current state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cannot {event} accreditation in state {from}")]
pub struct InvalidTransition {
    pub from: AccreditationStatus,
    pub event: AccreditationEvent,
}

impl AccreditationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccreditationStatus::NotRequested => "notRequested",
            AccreditationStatus::Pending => "pending",
            AccreditationStatus::Approved => "approved",
            AccreditationStatus::Rejected => "rejected",
        }
    }

    /// Applies an event, returning the next state.
    pub fn transition(self, event: AccreditationEvent) -> Result<Self, InvalidTransition> {
        use AccreditationEvent::*;
        use AccreditationStatus::*;

        match (self, event) {
            (NotRequested, Request) => Ok(Pending),
            (Pending, Approve) => Ok(Approved),
            (Pending, Reject) => Ok(Rejected),
            (from, event) => Err(InvalidTransition { from, event }),
        }
    }

    /// Whether no further event applies
    pub fn is_final(&self) -> bool {
        matches!(self, AccreditationStatus::Approved | AccreditationStatus::Rejected)
    }
}

impl fmt::Display for AccreditationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for AccreditationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccreditationEvent::Request => "request",
            AccreditationEvent::Approve => "approve",
            AccreditationEvent::Reject => "reject",
        };
        write!(f, "{}", name)
    }
}
