//! HTTP API Tests
//!
//! Drives the axum router in-process:
//! - schema violations come back as one 400 body listing every leaf
//! - listings clamp out-of-range pages to the last page
//! - locked and removed records refuse mutation with 409
//! - removal is soft: the record stays readable but leaves listings

use std::path::Path;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use goods_item_store::records::InMemoryRecordStore;
use goods_item_store::rest_api::{GoodsItemHandler, PageLimits, RestServer};
use goods_item_store::schema::{SchemaCache, SchemaLoader};
use serde_json::{json, Value};
use tower::ServiceExt;

const EORI: &str = "GB123456789012";

// =============================================================================
// Helper Functions
// =============================================================================

fn app() -> Router {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("schemas");
    let schemas = SchemaCache::new(SchemaLoader::new(dir));
    let handler = GoodsItemHandler::new(
        Arc::new(schemas),
        Arc::new(InMemoryRecordStore::new()),
        PageLimits::default(),
    );
    RestServer::new(handler).router()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn record_body(trader_ref: &str) -> Value {
    json!({
        "actorId": EORI,
        "traderRef": trader_ref,
        "comcode": "10410100",
        "goodsDescription": "Organic bananas",
        "countryOfOrigin": "EC",
        "category": 1,
        "comcodeEffectiveFromDate": "2024-11-18T23:20:19Z"
    })
}

async fn create(app: &Router, trader_ref: &str) -> Value {
    let (status, record) = send(
        app,
        Method::POST,
        &format!("/traders/{}/records", EORI),
        Some(record_body(trader_ref)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    record
}

fn record_uri(record: &Value) -> String {
    format!("/traders/{}/records/{}", EORI, record["recordId"].as_str().unwrap())
}

// =============================================================================
// Create & Read
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_returns_record_with_metadata() {
    let app = app();
    let record = create(&app, "BAN001001").await;

    assert_eq!(record["eori"], EORI);
    assert_eq!(record["traderRef"], "BAN001001");
    assert_eq!(record["supplementaryUnit"], Value::Null);
    assert_eq!(record["metadata"]["version"], 1);
    assert_eq!(record["metadata"]["active"], true);
    assert_eq!(record["metadata"]["locked"], false);
    assert_eq!(record["metadata"]["accreditationStatus"], "notRequested");

    let (status, fetched) = send(&app, Method::GET, &record_uri(&record), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, record);
}

#[tokio::test]
async fn test_validation_failure_body() {
    let app = app();
    let mut body = record_body("BAN001001");
    body.as_object_mut().unwrap().remove("comcode");
    body["countryOfOrigin"] = json!("Ecuador");

    let uri = format!("/traders/{}/records", EORI);
    let (status, error) = send(&app, Method::POST, &uri, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_REQUEST");
    let errors = error["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .any(|e| e["location"] == "$" && e["message"].as_str().unwrap().contains("comcode")));
    assert!(errors.iter().any(|e| e["location"] == "$.countryOfOrigin"));
}

#[tokio::test]
async fn test_impossible_date_lists_its_location() {
    let app = app();
    let mut body = record_body("BAN001001");
    body["comcodeEffectiveFromDate"] = json!("2024-13-45T99:99:99Z");

    let uri = format!("/traders/{}/records", EORI);
    let (status, error) = send(&app, Method::POST, &uri, Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_REQUEST");
    let errors = error["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["location"], "$.comcodeEffectiveFromDate");
}

#[tokio::test]
async fn test_malformed_json_body() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri(format!("/traders/{}/records", EORI))
        .body(Body::from("{\"actorId\":"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bad_path_parameters() {
    let app = app();
    let (status, error) = send(&app, Method::GET, "/traders/not-an-eori/records", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PATH_PARAMETER");

    let uri = format!("/traders/{}/records/123", EORI);
    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let unknown = format!("/traders/{}/records/{}", EORI, uuid::Uuid::new_v4());
    let (status, error) = send(&app, Method::GET, &unknown, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "RECORD_NOT_FOUND");
}

// =============================================================================
// Listing & Pagination
// =============================================================================

#[tokio::test]
async fn test_listing_second_page() {
    let app = app();
    for i in 0..5 {
        create(&app, &format!("REF{}", i)).await;
    }

    let uri = format!("/traders/{}/records?page=1&size=2", EORI);
    let (status, listing) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        listing["pagination"],
        json!({
            "totalRecords": 5,
            "currentPage": 1,
            "totalPages": 3,
            "nextPage": 2,
            "previousPage": 0
        })
    );
    assert_eq!(listing["goodsItemRecords"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_out_of_range_page_is_clamped() {
    let app = app();
    for i in 0..5 {
        create(&app, &format!("REF{}", i)).await;
    }

    let uri = format!("/traders/{}/records?page=9&size=2", EORI);
    let (status, listing) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["pagination"]["currentPage"], 2);
    assert_eq!(listing["pagination"]["previousPage"], 1);
    assert_eq!(listing["pagination"]["nextPage"], Value::Null);
    assert_eq!(listing["goodsItemRecords"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_empty_listing() {
    let uri = format!("/traders/{}/records", EORI);
    let (status, listing) = send(&app(), Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        listing,
        json!({
            "goodsItemRecords": [],
            "pagination": {
                "totalRecords": 0,
                "currentPage": 0,
                "totalPages": 0,
                "nextPage": null,
                "previousPage": null
            }
        })
    );
}

#[tokio::test]
async fn test_listing_rejects_bad_size() {
    let app = app();
    for size in ["0", "501", "ten"] {
        let uri = format!("/traders/{}/records?size={}", EORI, size);
        let (status, error) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "size={}", size);
        assert_eq!(error["code"], "INVALID_QUERY_PARAMETER");
    }
}

#[tokio::test]
async fn test_listing_is_scoped_to_trader() {
    let app = app();
    create(&app, "BAN001001").await;

    let (_, listing) = send(&app, Method::GET, "/traders/XI123456789012/records", None).await;
    assert_eq!(listing["pagination"]["totalRecords"], 0);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_update_bumps_version() {
    let app = app();
    let record = create(&app, "BAN001001").await;

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &record_uri(&record),
        Some(json!({"actorId": "XI123456789012", "goodsDescription": "Plantains"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["goodsDescription"], "Plantains");
    assert_eq!(updated["actorId"], "XI123456789012");
    assert_eq!(updated["comcode"], "10410100");
    assert_eq!(updated["metadata"]["version"], 2);
}

#[tokio::test]
async fn test_update_without_a_change_is_rejected() {
    let app = app();
    let record = create(&app, "BAN001001").await;

    let body = json!({"actorId": EORI, "category": null, "measurementUnit": null});
    let (status, error) = send(&app, Method::PATCH, &record_uri(&record), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["errors"][0]["location"], "$");

    let (_, fetched) = send(&app, Method::GET, &record_uri(&record), None).await;
    assert_eq!(fetched["metadata"]["version"], 1);
}

#[tokio::test]
async fn test_soft_delete() {
    let app = app();
    let record = create(&app, "BAN001001").await;
    create(&app, "BAN001002").await;

    let (status, error) = send(&app, Method::DELETE, &record_uri(&record), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["errors"][0]["location"], "$");
    assert!(error["errors"][0]["message"].as_str().unwrap().contains("actorId"));

    let uri = format!("{}?actorId={}", record_uri(&record), EORI);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, listing) = send(&app, Method::GET, &format!("/traders/{}/records", EORI), None).await;
    assert_eq!(listing["pagination"]["totalRecords"], 1);

    let (status, removed) = send(&app, Method::GET, &record_uri(&record), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["metadata"]["active"], false);
    assert_eq!(removed["metadata"]["version"], 2);

    let (status, error) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "RECORD_INACTIVE");
}

#[tokio::test]
async fn test_accreditation_locks_until_decided() {
    let app = app();
    let record = create(&app, "BAN001001").await;
    let uri = record_uri(&record);

    let (status, pending) = send(
        &app,
        Method::POST,
        &format!("{}/accreditation", uri),
        Some(json!({
            "actorId": EORI,
            "requestorName": "Mr. Phil Edwards",
            "requestorEmail": "Phil.Edwards@gmail.com"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending["metadata"]["locked"], true);
    assert_eq!(pending["metadata"]["accreditationStatus"], "pending");

    let (status, error) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(json!({"actorId": EORI, "comcode": "104101"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "RECORD_LOCKED");

    let (status, approved) = send(
        &app,
        Method::POST,
        &format!("{}/accreditation/decision", uri),
        Some(json!({"actorId": EORI, "decision": "approved"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["metadata"]["locked"], false);
    assert_eq!(approved["metadata"]["accreditationStatus"], "approved");
    assert_eq!(approved["metadata"]["version"], 3);

    let (status, error) = send(
        &app,
        Method::POST,
        &format!("{}/accreditation/decision", uri),
        Some(json!({"actorId": EORI, "decision": "rejected"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "INVALID_ACCREDITATION_TRANSITION");
}

#[tokio::test]
async fn test_review_flag_and_resolve() {
    let app = app();
    let record = create(&app, "BAN001001").await;
    let review_uri = format!("{}/review", record_uri(&record));

    let (status, flagged) = send(
        &app,
        Method::POST,
        &review_uri,
        Some(json!({"actorId": EORI, "reviewReason": "Commodity code has expired"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(flagged["metadata"]["toReview"], true);
    assert_eq!(flagged["metadata"]["reviewReason"], "Commodity code has expired");

    let uri = format!("{}?actorId={}", review_uri, EORI);
    let (status, resolved) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["metadata"]["toReview"], false);
    assert_eq!(resolved["metadata"]["reviewReason"], Value::Null);
}

// =============================================================================
// Profiles
// =============================================================================

#[tokio::test]
async fn test_profile_round_trip() {
    let app = app();
    let uri = format!("/traders/{}", EORI);

    let (status, error) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "PROFILE_NOT_FOUND");

    let (status, profile) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({
            "actorId": EORI,
            "ukimsNumber": "XIUKIM47699357400020231115081800",
            "nirmsNumber": "RMS-GB-123456",
            "niphlNumber": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["nirmsNumber"], "RMS-GB-123456");
    assert_eq!(profile["niphlNumber"], Value::Null);

    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, profile);
}
