//! Admin API resource operations.
//!
//! Each submodule adds an `impl ApiClient` block for one resource. Every
//! operation is a single request: no operation chains further calls, and
//! any non-2xx status is returned as an [`ApiError`](crate::ApiError).

mod auth;
mod dashboard;
mod locations;
mod meals;
mod orders;
mod profile;
mod users;

pub use orders::OrderQuery;

use lunchdesk_core::models::{Listed, Record, decode_record};
use lunchdesk_core::{Ack, Page};
use serde_json::Value;

use crate::error::ApiError;

/// `page` and `limit` query parameters.
fn page_query(page: u32, limit: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("limit", limit.to_string())]
}

fn record<T: Record>(body: Value) -> Result<T, ApiError> {
    Ok(decode_record(body)?)
}

fn page<T: Listed>(body: Value) -> Result<Page<T>, ApiError> {
    Ok(Page::from_envelope(body)?)
}

/// Acknowledgements are informational; a body of another shape still means
/// the request succeeded.
fn ack(body: Value) -> Ack {
    serde_json::from_value(body).unwrap_or_default()
}
