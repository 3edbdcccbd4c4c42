//! Record, profile and request payload types
//!
//! Request payloads are only deserialized after the raw JSON has passed
//! schema validation, so their serde shape mirrors the schemas in
//! `schemas/`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::accreditation::{AccreditationEvent, AccreditationStatus};
use super::errors::{RecordError, RecordResult};

/// Business payload of a goods item record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsItem {
    pub trader_ref: String,
    pub comcode: String,
    pub goods_description: String,
    pub country_of_origin: String,
    #[serde(default)]
    pub category: Option<u8>,
    #[serde(default)]
    pub supplementary_unit: Option<f64>,
    #[serde(default)]
    pub measurement_unit: Option<String>,
    pub comcode_effective_from_date: DateTime<Utc>,
    #[serde(default)]
    pub comcode_effective_to_date: Option<DateTime<Utc>>,
}

/// Lifecycle metadata carried by every record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordMetadata {
    pub version: u64,
    pub active: bool,
    pub locked: bool,
    pub to_review: bool,
    pub review_reason: Option<String>,
    pub accreditation_status: AccreditationStatus,
    pub created_date_time: DateTime<Utc>,
    pub updated_date_time: DateTime<Utc>,
}

impl RecordMetadata {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            version: 1,
            active: true,
            locked: false,
            to_review: false,
            review_reason: None,
            accreditation_status: AccreditationStatus::NotRequested,
            created_date_time: now,
            updated_date_time: now,
        }
    }
}

/// A goods item record as stored and as returned on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsItemRecord {
    pub record_id: Uuid,
    pub eori: String,
    pub actor_id: String,
    #[serde(flatten)]
    pub goods_item: GoodsItem,
    pub metadata: RecordMetadata,
}

impl GoodsItemRecord {
    /// Builds a new record from a validated create request.
    pub fn create(
        eori: impl Into<String>,
        request: CreateRecordRequest,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            eori: eori.into(),
            actor_id: request.actor_id,
            goods_item: request.goods_item,
            metadata: RecordMetadata::new(now),
        }
    }

    /// Applies a partial update. Absent fields are left unchanged.
    pub fn apply_update(
        &mut self,
        request: UpdateRecordRequest,
        now: DateTime<Utc>,
    ) -> RecordResult<()> {
        self.ensure_mutable()?;

        let item = &mut self.goods_item;
        if let Some(trader_ref) = request.trader_ref {
            item.trader_ref = trader_ref;
        }
        if let Some(comcode) = request.comcode {
            item.comcode = comcode;
        }
        if let Some(description) = request.goods_description {
            item.goods_description = description;
        }
        if let Some(country) = request.country_of_origin {
            item.country_of_origin = country;
        }
        if request.category.is_some() {
            item.category = request.category;
        }
        if request.supplementary_unit.is_some() {
            item.supplementary_unit = request.supplementary_unit;
        }
        if request.measurement_unit.is_some() {
            item.measurement_unit = request.measurement_unit;
        }
        if let Some(from) = request.comcode_effective_from_date {
            item.comcode_effective_from_date = from;
        }
        if request.comcode_effective_to_date.is_some() {
            item.comcode_effective_to_date = request.comcode_effective_to_date;
        }

        self.touch(request.actor_id, now);
        Ok(())
    }

    /// Soft delete.
    pub fn remove(&mut self, request: RemoveRecordRequest, now: DateTime<Utc>) -> RecordResult<()> {
        self.ensure_mutable()?;
        self.metadata.active = false;
        self.touch(request.actor_id, now);
        Ok(())
    }

    /// Moves accreditation to `Pending` and locks the record.
    pub fn request_accreditation(
        &mut self,
        request: AccreditationRequest,
        now: DateTime<Utc>,
    ) -> RecordResult<()> {
        self.ensure_mutable()?;
        self.metadata.accreditation_status = self
            .metadata
            .accreditation_status
            .transition(AccreditationEvent::Request)?;
        self.metadata.locked = true;
        self.touch(request.actor_id, now);
        Ok(())
    }

    /// Records the accreditation outcome and releases the lock. Permitted
    /// on a locked record.
    pub fn decide_accreditation(
        &mut self,
        request: AccreditationDecisionRequest,
        now: DateTime<Utc>,
    ) -> RecordResult<()> {
        self.ensure_active()?;
        let event = match request.decision {
            AccreditationDecision::Approved => AccreditationEvent::Approve,
            AccreditationDecision::Rejected => AccreditationEvent::Reject,
        };
        self.metadata.accreditation_status = self.metadata.accreditation_status.transition(event)?;
        self.metadata.locked = false;
        self.touch(request.actor_id, now);
        Ok(())
    }

    /// Flags the record for manual review. Allowed in any accreditation
    /// state; a second flag replaces the reason.
    pub fn flag_for_review(
        &mut self,
        request: ReviewRequest,
        now: DateTime<Utc>,
    ) -> RecordResult<()> {
        self.ensure_active()?;
        self.metadata.to_review = true;
        self.metadata.review_reason = Some(request.review_reason);
        self.touch(request.actor_id, now);
        Ok(())
    }

    /// Clears the review flag.
    pub fn resolve_review(
        &mut self,
        request: ResolveReviewRequest,
        now: DateTime<Utc>,
    ) -> RecordResult<()> {
        self.ensure_active()?;
        self.metadata.to_review = false;
        self.metadata.review_reason = None;
        self.touch(request.actor_id, now);
        Ok(())
    }

    fn ensure_active(&self) -> RecordResult<()> {
        if !self.metadata.active {
            return Err(RecordError::Inactive(self.record_id));
        }
        Ok(())
    }

    fn ensure_mutable(&self) -> RecordResult<()> {
        self.ensure_active()?;
        if self.metadata.locked {
            return Err(RecordError::Locked(self.record_id));
        }
        Ok(())
    }

    fn touch(&mut self, actor_id: String, now: DateTime<Utc>) {
        self.actor_id = actor_id;
        self.metadata.version += 1;
        self.metadata.updated_date_time = now;
    }
}

/// A trader's profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraderProfile {
    pub eori: String,
    pub actor_id: String,
    pub ukims_number: String,
    pub nirms_number: Option<String>,
    pub niphl_number: Option<String>,
    pub updated_date_time: DateTime<Utc>,
}

impl TraderProfile {
    pub fn maintain(
        eori: impl Into<String>,
        request: MaintainProfileRequest,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            eori: eori.into(),
            actor_id: request.actor_id,
            ukims_number: request.ukims_number,
            nirms_number: request.nirms_number,
            niphl_number: request.niphl_number,
            updated_date_time: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    pub actor_id: String,
    #[serde(flatten)]
    pub goods_item: GoodsItem,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordRequest {
    pub actor_id: String,
    #[serde(default)]
    pub trader_ref: Option<String>,
    #[serde(default)]
    pub comcode: Option<String>,
    #[serde(default)]
    pub goods_description: Option<String>,
    #[serde(default)]
    pub country_of_origin: Option<String>,
    #[serde(default)]
    pub category: Option<u8>,
    #[serde(default)]
    pub supplementary_unit: Option<f64>,
    #[serde(default)]
    pub measurement_unit: Option<String>,
    #[serde(default)]
    pub comcode_effective_from_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comcode_effective_to_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRecordRequest {
    pub actor_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintainProfileRequest {
    pub actor_id: String,
    pub ukims_number: String,
    #[serde(default)]
    pub nirms_number: Option<String>,
    #[serde(default)]
    pub niphl_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccreditationRequest {
    pub actor_id: String,
    pub requestor_name: String,
    pub requestor_email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccreditationDecision {
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccreditationDecisionRequest {
    pub actor_id: String,
    pub decision: AccreditationDecision,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub actor_id: String,
    pub review_reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReviewRequest {
    pub actor_id: String,
}
