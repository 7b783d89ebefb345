//! Customer orders.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Listed, Record};
use crate::types::{OrderId, OrderStatus};

/// An order. Only the id and status are interpreted; the remaining fields
/// belong to the server and are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    pub status: OrderStatus,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// Body of `PUT /admin/orders/:id/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

impl Record for Order {
    const SINGULAR: &'static str = "order";
}

impl Listed for Order {
    const COLLECTION: &'static str = "orders";
}
