//! Entity records returned by the admin API.
//!
//! Every record is an explicit struct so malformed payloads are rejected at
//! the deserialization boundary instead of leaking into views.

pub mod auth;
pub mod customer;
pub mod dashboard;
pub mod location;
pub mod meal;
pub mod order;
pub mod page;
pub mod profile;

pub use auth::{Ack, LoginResponse, LoginUser};
pub use customer::Customer;
pub use dashboard::DashboardStats;
pub use location::{Creator, Location, LocationStatusUpdate};
pub use meal::Meal;
pub use order::{Order, OrderStatusUpdate};
pub use page::{Page, PageError, Pager, Pagination};
pub use profile::Profile;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// A record type that the admin API returns on its own from get, create and
/// update endpoints.
pub trait Record: DeserializeOwned {
    /// Key that may wrap a single record (`{ "location": { ... } }`).
    const SINGULAR: &'static str;
}

/// A record type that has a paginated list endpoint.
pub trait Listed: Record {
    /// Key of the item array in list envelopes (`{ "locations": [...] }`).
    const COLLECTION: &'static str;
}

/// Decode a single record from a response body.
///
/// The API is inconsistent about wrapping: some endpoints return the bare
/// record, others `{ "<singular>": record, "message": ... }` or
/// `{ "data": record }`. All three shapes are accepted.
///
/// # Errors
///
/// Returns the `serde_json` error if the selected value does not match `T`.
pub fn decode_record<T: Record>(body: Value) -> Result<T, serde_json::Error> {
    let inner = match body {
        Value::Object(mut map) => {
            if let Some(record @ Value::Object(_)) = map.remove(T::SINGULAR) {
                record
            } else if let Some(record @ Value::Object(_)) = map.remove("data") {
                record
            } else {
                Value::Object(map)
            }
        }
        other => other,
    };
    serde_json::from_value(inner)
}
