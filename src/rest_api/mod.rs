//! # Goods Item REST API Module
//!
//! HTTP endpoints for goods item records, their accreditation and review
//! workflow, and trader profiles. Request bodies are validated against the
//! request schemas before any record is touched.

pub mod errors;
pub mod handler;
pub mod parser;
pub mod response;
pub mod server;

pub use errors::{ErrorResponse, RestError, RestResult};
pub use handler::GoodsItemHandler;
pub use parser::{ListParams, PageLimits};
pub use response::GoodsItemListResponse;
pub use server::RestServer;
