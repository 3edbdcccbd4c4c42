//! Record persistence seam
//!
//! The store is a stub: [`InMemoryRecordStore`] keeps everything in process
//! memory. Writes are guarded by an optimistic version check so concurrent
//! updates of one record cannot silently overwrite each other.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::{RecordError, RecordResult};
use super::model::{GoodsItemRecord, TraderProfile};

/// Listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Only records updated at or after this instant
    pub updated_since: Option<DateTime<Utc>>,
    /// Include soft-deleted records
    pub include_inactive: bool,
}

impl RecordQuery {
    pub fn matches(&self, record: &GoodsItemRecord) -> bool {
        if !self.include_inactive && !record.metadata.active {
            return false;
        }
        match self.updated_since {
            Some(since) => record.metadata.updated_date_time >= since,
            None => true,
        }
    }
}

/// Storage operations required by the REST layer.
pub trait RecordStore: Send + Sync {
    /// Inserts a new record.
    fn insert(&self, record: GoodsItemRecord) -> RecordResult<()>;

    /// Looks up a record owned by `eori`, inactive ones included.
    fn find(&self, eori: &str, record_id: Uuid) -> RecordResult<GoodsItemRecord>;

    /// Replaces a record if its stored version still equals
    /// `expected_version`.
    fn replace(&self, record: GoodsItemRecord, expected_version: u64) -> RecordResult<()>;

    /// Counts the records of `eori` matching `query` and returns the slice
    /// that `window` picks for that count, both read from one snapshot.
    ///
    /// `window` maps the total to `(offset, limit)`. Records are ordered by
    /// creation time then record id.
    fn count_and_slice(
        &self,
        eori: &str,
        query: &RecordQuery,
        window: &dyn Fn(u64) -> (u64, u64),
    ) -> RecordResult<(u64, Vec<GoodsItemRecord>)>;

    /// Creates or replaces the profile of `profile.eori`.
    fn upsert_profile(&self, profile: TraderProfile) -> RecordResult<()>;

    fn find_profile(&self, eori: &str) -> RecordResult<TraderProfile>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<Uuid, GoodsItemRecord>>,
    profiles: RwLock<HashMap<String, TraderProfile>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> RecordResult<RwLockReadGuard<'_, HashMap<Uuid, GoodsItemRecord>>> {
        self.records
            .read()
            .map_err(|_| RecordError::Store("record lock poisoned".into()))
    }

    fn records_mut(&self) -> RecordResult<RwLockWriteGuard<'_, HashMap<Uuid, GoodsItemRecord>>> {
        self.records
            .write()
            .map_err(|_| RecordError::Store("record lock poisoned".into()))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert(&self, record: GoodsItemRecord) -> RecordResult<()> {
        let mut records = self.records_mut()?;
        if records.contains_key(&record.record_id) {
            return Err(RecordError::AlreadyExists(record.record_id));
        }
        records.insert(record.record_id, record);
        Ok(())
    }

    fn find(&self, eori: &str, record_id: Uuid) -> RecordResult<GoodsItemRecord> {
        self.records()?
            .get(&record_id)
            .filter(|r| r.eori == eori)
            .cloned()
            .ok_or(RecordError::NotFound(record_id))
    }

    fn replace(&self, record: GoodsItemRecord, expected_version: u64) -> RecordResult<()> {
        let mut records = self.records_mut()?;
        let stored = records
            .get_mut(&record.record_id)
            .filter(|r| r.eori == record.eori)
            .ok_or(RecordError::NotFound(record.record_id))?;

        if stored.metadata.version != expected_version {
            return Err(RecordError::VersionConflict {
                record_id: record.record_id,
                expected: expected_version,
                found: stored.metadata.version,
            });
        }
        *stored = record;
        Ok(())
    }

    fn count_and_slice(
        &self,
        eori: &str,
        query: &RecordQuery,
        window: &dyn Fn(u64) -> (u64, u64),
    ) -> RecordResult<(u64, Vec<GoodsItemRecord>)> {
        let records = self.records()?;
        let mut matching: Vec<&GoodsItemRecord> = records
            .values()
            .filter(|r| r.eori == eori && query.matches(r))
            .collect();
        matching.sort_by(|a, b| {
            a.metadata
                .created_date_time
                .cmp(&b.metadata.created_date_time)
                .then_with(|| a.record_id.cmp(&b.record_id))
        });

        let total = matching.len() as u64;
        let (offset, limit) = window(total);
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        let slice: Vec<GoodsItemRecord> =
            matching.into_iter().skip(skip).take(take).cloned().collect();
        Ok((total, slice))
    }

    fn upsert_profile(&self, profile: TraderProfile) -> RecordResult<()> {
        self.profiles
            .write()
            .map_err(|_| RecordError::Store("profile lock poisoned".into()))?
            .insert(profile.eori.clone(), profile);
        Ok(())
    }

    fn find_profile(&self, eori: &str) -> RecordResult<TraderProfile> {
        self.profiles
            .read()
            .map_err(|_| RecordError::Store("profile lock poisoned".into()))?
            .get(eori)
            .cloned()
            .ok_or_else(|| RecordError::ProfileNotFound(eori.to_string()))
    }
}
