//! # REST API Handler
//!
//! Validates request bodies against their schema, applies record lifecycle
//! transitions and persists the result.
//!
//! Every request body is checked as raw JSON before it is bound to a typed
//! payload, so a client sees all schema violations at once rather than the
//! first serde error.

use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::observability::Event;
use crate::records::{
    AccreditationDecisionRequest, AccreditationRequest, CreateRecordRequest, GoodsItemRecord,
    MaintainProfileRequest, RecordQuery, RecordResult, RecordStore, RemoveRecordRequest,
    ResolveReviewRequest, ReviewRequest, TraderProfile, UpdateRecordRequest,
};
use crate::schema::{self, RequestSchema, SchemaCache, ValidationError};

use super::errors::{RestError, RestResult};
use super::parser::{ListParams, PageLimits};
use super::response::GoodsItemListResponse;

/// Goods item operations behind the HTTP routes
pub struct GoodsItemHandler<S: RecordStore> {
    schemas: Arc<SchemaCache>,
    store: Arc<S>,
    limits: PageLimits,
}

impl<S: RecordStore> GoodsItemHandler<S> {
    pub fn new(schemas: Arc<SchemaCache>, store: Arc<S>, limits: PageLimits) -> Self {
        Self {
            schemas,
            store,
            limits,
        }
    }

    pub fn limits(&self) -> &PageLimits {
        &self.limits
    }

    /// Validates `body` against the request schema, then binds it.
    fn validated<T: DeserializeOwned>(
        &self,
        request: RequestSchema,
        body: Value,
    ) -> RestResult<T> {
        let schema = self.schemas.request(request)?;
        let errors = schema::validate(&schema, &body);
        if !errors.is_empty() {
            tracing::info!(
                event = %Event::ValidationFailed,
                schema = request.name(),
                errors = errors.len()
            );
            return Err(RestError::ValidationFailed(errors));
        }
        serde_json::from_value(body).map_err(|e| {
            RestError::ValidationFailed(vec![ValidationError::new(
                "$",
                format!("request body could not be bound: {}", e),
            )])
        })
    }

    /// Reads a record, applies `change` and writes it back guarded by the
    /// version that was read.
    fn mutate<F>(&self, eori: &str, record_id: Uuid, change: F) -> RestResult<GoodsItemRecord>
    where
        F: FnOnce(&mut GoodsItemRecord) -> RecordResult<()>,
    {
        let mut record = self.store.find(eori, record_id)?;
        let read_version = record.metadata.version;
        change(&mut record)?;
        self.store.replace(record.clone(), read_version)?;
        Ok(record)
    }

    pub fn create(&self, eori: &str, body: Value) -> RestResult<GoodsItemRecord> {
        let request: CreateRecordRequest = self.validated(RequestSchema::CreateRecord, body)?;
        let record = GoodsItemRecord::create(eori, request, Utc::now());
        self.store.insert(record.clone())?;

        tracing::info!(event = %Event::RecordCreated, eori, record_id = %record.record_id);
        Ok(record)
    }

    pub fn get(&self, eori: &str, record_id: Uuid) -> RestResult<GoodsItemRecord> {
        Ok(self.store.find(eori, record_id)?)
    }

    pub fn update(&self, eori: &str, record_id: Uuid, body: Value) -> RestResult<GoodsItemRecord> {
        let request: UpdateRecordRequest = self.validated(RequestSchema::UpdateRecord, body)?;
        let record = self.mutate(eori, record_id, |r| r.apply_update(request, Utc::now()))?;

        tracing::info!(
            event = %Event::RecordUpdated,
            eori,
            record_id = %record_id,
            version = record.metadata.version
        );
        Ok(record)
    }

    /// Soft delete. The body is built from the `actorId` query parameter.
    pub fn remove(
        &self,
        eori: &str,
        record_id: Uuid,
        query: Map<String, Value>,
    ) -> RestResult<()> {
        let request: RemoveRecordRequest =
            self.validated(RequestSchema::RemoveRecord, Value::Object(query))?;
        self.mutate(eori, record_id, |r| r.remove(request, Utc::now()))?;

        tracing::info!(event = %Event::RecordRemoved, eori, record_id = %record_id);
        Ok(())
    }

    /// One page of the trader's active records.
    pub fn list(&self, eori: &str, params: ListParams) -> RestResult<GoodsItemListResponse> {
        let query = RecordQuery {
            updated_since: params.last_updated_date,
            include_inactive: false,
        };
        let response = GoodsItemListResponse::assemble(
            &*self.store,
            eori,
            &query,
            params.page,
            params.size,
        )?;

        tracing::debug!(
            event = %Event::RecordsListed,
            eori,
            requested_page = params.page,
            current_page = response.pagination.current_page,
            total_records = response.pagination.total_records
        );
        Ok(response)
    }

    pub fn request_accreditation(
        &self,
        eori: &str,
        record_id: Uuid,
        body: Value,
    ) -> RestResult<GoodsItemRecord> {
        let request: AccreditationRequest =
            self.validated(RequestSchema::RequestAccreditation, body)?;
        let record =
            self.mutate(eori, record_id, |r| r.request_accreditation(request, Utc::now()))?;

        tracing::info!(event = %Event::AccreditationRequested, eori, record_id = %record_id);
        Ok(record)
    }

    pub fn decide_accreditation(
        &self,
        eori: &str,
        record_id: Uuid,
        body: Value,
    ) -> RestResult<GoodsItemRecord> {
        let request: AccreditationDecisionRequest =
            self.validated(RequestSchema::AccreditationDecision, body)?;
        let record =
            self.mutate(eori, record_id, |r| r.decide_accreditation(request, Utc::now()))?;

        tracing::info!(
            event = %Event::AccreditationDecided,
            eori,
            record_id = %record_id,
            status = record.metadata.accreditation_status.as_str()
        );
        Ok(record)
    }

    pub fn flag_review(
        &self,
        eori: &str,
        record_id: Uuid,
        body: Value,
    ) -> RestResult<GoodsItemRecord> {
        let request: ReviewRequest = self.validated(RequestSchema::Review, body)?;
        let record = self.mutate(eori, record_id, |r| r.flag_for_review(request, Utc::now()))?;

        tracing::info!(event = %Event::ReviewFlagged, eori, record_id = %record_id);
        Ok(record)
    }

    /// Clears the review flag. The body is built from the `actorId` query
    /// parameter.
    pub fn resolve_review(
        &self,
        eori: &str,
        record_id: Uuid,
        query: Map<String, Value>,
    ) -> RestResult<GoodsItemRecord> {
        let request: ResolveReviewRequest =
            self.validated(RequestSchema::ResolveReview, Value::Object(query))?;
        let record = self.mutate(eori, record_id, |r| r.resolve_review(request, Utc::now()))?;

        tracing::info!(event = %Event::ReviewResolved, eori, record_id = %record_id);
        Ok(record)
    }

    pub fn maintain_profile(&self, eori: &str, body: Value) -> RestResult<TraderProfile> {
        let request: MaintainProfileRequest = self.validated(RequestSchema::MaintainProfile, body)?;
        let profile = TraderProfile::maintain(eori, request, Utc::now());
        self.store.upsert_profile(profile.clone())?;

        tracing::info!(event = %Event::ProfileMaintained, eori);
        Ok(profile)
    }

    pub fn get_profile(&self, eori: &str) -> RestResult<TraderProfile> {
        Ok(self.store.find_profile(eori)?)
    }
}
