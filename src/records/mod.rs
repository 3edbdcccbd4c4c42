//! Goods item records and trader profiles
//!
//! The record lifecycle:
//! - created active, unlocked, version 1, accreditation `NotRequested`
//! - every successful mutation bumps `version` by one
//! - removal is a soft delete (`active = false`); removed records stay
//!   readable by id but leave listings and reject further mutation
//! - a locked record rejects updates and removal; the accreditation
//!   decision is the transition that releases the lock

mod accreditation;
mod errors;
mod model;
mod store;

pub use accreditation::{AccreditationEvent, AccreditationStatus, InvalidTransition};
pub use errors::{RecordError, RecordResult};
pub use model::{
    AccreditationDecision, AccreditationDecisionRequest, AccreditationRequest, CreateRecordRequest,
    GoodsItem, GoodsItemRecord, MaintainProfileRequest, RecordMetadata, RemoveRecordRequest,
    ResolveReviewRequest, ReviewRequest, TraderProfile, UpdateRecordRequest,
};
pub use store::{InMemoryRecordStore, RecordQuery, RecordStore};
