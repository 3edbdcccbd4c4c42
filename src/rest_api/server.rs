//! # REST API HTTP Server
//!
//! Axum router for the goods item endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::observability::Event;
use crate::records::{GoodsItemRecord, RecordStore, TraderProfile};

use super::errors::{RestError, RestResult};
use super::handler::GoodsItemHandler;
use super::parser::{parse_eori, parse_record_id, ListParams};
use super::response::GoodsItemListResponse;

/// REST API server
pub struct RestServer<S: RecordStore> {
    handler: Arc<GoodsItemHandler<S>>,
    cors_origins: Vec<String>,
}

impl<S: RecordStore + 'static> RestServer<S> {
    pub fn new(handler: GoodsItemHandler<S>) -> Self {
        Self {
            handler: Arc::new(handler),
            cors_origins: Vec::new(),
        }
    }

    /// Restricts CORS to the given origins. With none configured any
    /// origin is allowed.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    fn cors(&self) -> CorsLayer {
        let origin = if self.cors_origins.is_empty() {
            AllowOrigin::any()
        } else {
            let origins: Vec<_> = self.cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
            AllowOrigin::list(origins)
        };
        CorsLayer::new().allow_origin(origin).allow_methods(Any).allow_headers(Any)
    }

    /// Build the Axum router
    pub fn router(self) -> Router {
        let cors = self.cors();

        Router::new()
            .route("/health", get(health_handler))
            .route(
                "/traders/:eori",
                get(get_profile_handler::<S>).put(maintain_profile_handler::<S>),
            )
            .route(
                "/traders/:eori/records",
                get(list_handler::<S>).post(create_handler::<S>),
            )
            .route(
                "/traders/:eori/records/:record_id",
                get(get_handler::<S>)
                    .patch(update_handler::<S>)
                    .delete(remove_handler::<S>),
            )
            .route(
                "/traders/:eori/records/:record_id/accreditation",
                post(request_accreditation_handler::<S>),
            )
            .route(
                "/traders/:eori/records/:record_id/accreditation/decision",
                post(decide_accreditation_handler::<S>),
            )
            .route(
                "/traders/:eori/records/:record_id/review",
                post(flag_review_handler::<S>).delete(resolve_review_handler::<S>),
            )
            .with_state(self.handler)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
    }

    /// Serves requests on an already bound listener until the process
    /// stops.
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(event = %Event::Serving, %addr);
        axum::serve(listener, self.router()).await?;
        tracing::info!(event = %Event::ShutdownComplete);
        Ok(())
    }
}

/// Shared state type
type ServerState<S> = Arc<GoodsItemHandler<S>>;

/// Parses a request body as JSON. Schema validation happens later, on the
/// raw value.
fn json_body(body: &Bytes) -> RestResult<Value> {
    serde_json::from_slice(body).map_err(|e| RestError::InvalidBody(e.to_string()))
}

/// Turns query parameters into a JSON object so they can be validated
/// like a body.
fn query_object(query: HashMap<String, String>) -> Map<String, Value> {
    query.into_iter().map(|(k, v)| (k, Value::String(v))).collect()
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// List records handler
async fn list_handler<S: RecordStore + 'static>(
    State(handler): State<ServerState<S>>,
    Path(eori): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> RestResult<Json<GoodsItemListResponse>> {
    let eori = parse_eori(&eori)?;
    let params = ListParams::parse(&query, handler.limits())?;
    Ok(Json(handler.list(&eori, params)?))
}

/// Create record handler
async fn create_handler<S: RecordStore + 'static>(
    State(handler): State<ServerState<S>>,
    Path(eori): Path<String>,
    body: Bytes,
) -> RestResult<(StatusCode, Json<GoodsItemRecord>)> {
    let eori = parse_eori(&eori)?;
    let record = handler.create(&eori, json_body(&body)?)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Get single record handler
async fn get_handler<S: RecordStore + 'static>(
    State(handler): State<ServerState<S>>,
    Path((eori, record_id)): Path<(String, String)>,
) -> RestResult<Json<GoodsItemRecord>> {
    let eori = parse_eori(&eori)?;
    let record_id = parse_record_id(&record_id)?;
    Ok(Json(handler.get(&eori, record_id)?))
}

/// Update record handler
async fn update_handler<S: RecordStore + 'static>(
    State(handler): State<ServerState<S>>,
    Path((eori, record_id)): Path<(String, String)>,
    body: Bytes,
) -> RestResult<Json<GoodsItemRecord>> {
    let eori = parse_eori(&eori)?;
    let record_id = parse_record_id(&record_id)?;
    Ok(Json(handler.update(&eori, record_id, json_body(&body)?)?))
}

/// Remove record handler
async fn remove_handler<S: RecordStore + 'static>(
    State(handler): State<ServerState<S>>,
    Path((eori, record_id)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> RestResult<StatusCode> {
    let eori = parse_eori(&eori)?;
    let record_id = parse_record_id(&record_id)?;
    handler.remove(&eori, record_id, query_object(query))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn request_accreditation_handler<S: RecordStore + 'static>(
    State(handler): State<ServerState<S>>,
    Path((eori, record_id)): Path<(String, String)>,
    body: Bytes,
) -> RestResult<Json<GoodsItemRecord>> {
    let eori = parse_eori(&eori)?;
    let record_id = parse_record_id(&record_id)?;
    Ok(Json(handler.request_accreditation(&eori, record_id, json_body(&body)?)?))
}

async fn decide_accreditation_handler<S: RecordStore + 'static>(
    State(handler): State<ServerState<S>>,
    Path((eori, record_id)): Path<(String, String)>,
    body: Bytes,
) -> RestResult<Json<GoodsItemRecord>> {
    let eori = parse_eori(&eori)?;
    let record_id = parse_record_id(&record_id)?;
    Ok(Json(handler.decide_accreditation(&eori, record_id, json_body(&body)?)?))
}

async fn flag_review_handler<S: RecordStore + 'static>(
    State(handler): State<ServerState<S>>,
    Path((eori, record_id)): Path<(String, String)>,
    body: Bytes,
) -> RestResult<Json<GoodsItemRecord>> {
    let eori = parse_eori(&eori)?;
    let record_id = parse_record_id(&record_id)?;
    Ok(Json(handler.flag_review(&eori, record_id, json_body(&body)?)?))
}

async fn resolve_review_handler<S: RecordStore + 'static>(
    State(handler): State<ServerState<S>>,
    Path((eori, record_id)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> RestResult<Json<GoodsItemRecord>> {
    let eori = parse_eori(&eori)?;
    let record_id = parse_record_id(&record_id)?;
    Ok(Json(handler.resolve_review(&eori, record_id, query_object(query))?))
}

async fn get_profile_handler<S: RecordStore + 'static>(
    State(handler): State<ServerState<S>>,
    Path(eori): Path<String>,
) -> RestResult<Json<TraderProfile>> {
    let eori = parse_eori(&eori)?;
    Ok(Json(handler.get_profile(&eori)?))
}

async fn maintain_profile_handler<S: RecordStore + 'static>(
    State(handler): State<ServerState<S>>,
    Path(eori): Path<String>,
    body: Bytes,
) -> RestResult<Json<TraderProfile>> {
    let eori = parse_eori(&eori)?;
    Ok(Json(handler.maintain_profile(&eori, json_body(&body)?)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body() {
        assert_eq!(json_body(&Bytes::from_static(b"{\"a\":1}")).unwrap(), json!({"a": 1}));
        assert!(matches!(
            json_body(&Bytes::from_static(b"{\"a\":")),
            Err(RestError::InvalidBody(_))
        ));
        assert!(matches!(json_body(&Bytes::new()), Err(RestError::InvalidBody(_))));
    }

    #[test]
    fn test_query_object() {
        let mut query = HashMap::new();
        query.insert("actorId".to_string(), "GB123456789012".to_string());
        assert_eq!(
            Value::Object(query_object(query)),
            json!({"actorId": "GB123456789012"})
        );
    }
}
