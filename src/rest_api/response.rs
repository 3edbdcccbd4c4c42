//! # Response Formatting
//!
//! Listing envelope for goods item records.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use crate::pagination::{self, PageDescriptor};
use crate::records::{GoodsItemRecord, RecordQuery, RecordResult, RecordStore};

/// One page of a trader's records with its pagination metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsItemListResponse {
    pub goods_item_records: Vec<GoodsItemRecord>,
    pub pagination: PageDescriptor,
}

impl GoodsItemListResponse {
    pub fn new(goods_item_records: Vec<GoodsItemRecord>, pagination: PageDescriptor) -> Self {
        Self {
            goods_item_records,
            pagination,
        }
    }

    /// Clamps the requested page against the matching record count and
    /// reads the slice for the clamped page in the same store snapshot.
    pub fn assemble<S: RecordStore + ?Sized>(
        store: &S,
        eori: &str,
        query: &RecordQuery,
        page: u64,
        size: NonZeroU64,
    ) -> RecordResult<Self> {
        let window = |total: u64| {
            let descriptor = pagination::compute(total, page, size);
            (descriptor.offset(size), size.get())
        };
        let (total, records) = store.count_and_slice(eori, query, &window)?;
        Ok(Self::new(records, pagination::compute(total, page, size)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{CreateRecordRequest, InMemoryRecordStore};
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    const EORI: &str = "GB123456789012";

    fn seed(store: &InMemoryRecordStore, count: usize) {
        for i in 0..count {
            let request: CreateRecordRequest = serde_json::from_value(json!({
                "actorId": EORI,
                "traderRef": format!("REF{}", i),
                "comcode": "10410100",
                "goodsDescription": "Organic bananas",
                "countryOfOrigin": "EC",
                "comcodeEffectiveFromDate": "2024-11-18T23:20:19Z"
            }))
            .unwrap();
            store
                .insert(GoodsItemRecord::create(EORI, request, Utc::now()))
                .unwrap();
        }
    }

    fn size(n: u64) -> NonZeroU64 {
        NonZeroU64::new(n).unwrap()
    }

    #[test]
    fn test_out_of_range_page_shows_last_page() {
        let store = InMemoryRecordStore::new();
        seed(&store, 5);

        let query = RecordQuery::default();
        let response = GoodsItemListResponse::assemble(&store, EORI, &query, 9, size(2)).unwrap();
        assert_eq!(response.pagination.current_page, 2);
        assert_eq!(response.pagination.previous_page, Some(1));
        assert_eq!(response.pagination.next_page, None);
        assert_eq!(response.goods_item_records.len(), 1);
    }

    #[test]
    fn test_listing_stays_consistent_under_concurrent_inserts() {
        let store = Arc::new(InMemoryRecordStore::new());
        seed(&store, 3);

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || seed(&store, 200))
        };
        for _ in 0..200 {
            let query = RecordQuery::default();
            let response =
                GoodsItemListResponse::assemble(&*store, EORI, &query, 1_000, size(4)).unwrap();
            let pagination = response.pagination;
            let expected = pagination.total_records - pagination.current_page * 4;
            assert_eq!(response.goods_item_records.len() as u64, expected.min(4));
        }
        writer.join().unwrap();
    }

    #[test]
    fn test_empty_listing() {
        let store = InMemoryRecordStore::new();
        let query = RecordQuery::default();
        let response =
            GoodsItemListResponse::assemble(&store, EORI, &query, 3, size(500)).unwrap();

        assert!(response.goods_item_records.is_empty());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json["pagination"],
            json!({
                "totalRecords": 0,
                "currentPage": 0,
                "totalPages": 0,
                "nextPage": null,
                "previousPage": null
            })
        );
        assert_eq!(json["goodsItemRecords"], json!([]));
    }
}
