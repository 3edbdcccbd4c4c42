//! goods-item-store - goods item trade records behind a JSON HTTP API
//!
//! - `schema`: draft-04 request schemas and the violation-tree validator
//! - `pagination`: page boundaries with clamp-down on out-of-range pages
//! - `records`: record lifecycle, accreditation workflow and the store seam
//! - `rest_api`: axum routes, request validation and error mapping
//! - `cli`: `serve` and `validate` commands
//! - `observability`: structured logging

pub mod cli;
pub mod observability;
pub mod pagination;
pub mod records;
pub mod rest_api;
pub mod schema;
