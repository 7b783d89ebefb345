//! Order operations.

use lunchdesk_core::{Order, OrderId, OrderStatus, OrderStatusUpdate, Page};
use tracing::instrument;

use super::{page, page_query, record};
use crate::client::ApiClient;
use crate::error::ApiError;

/// Filters for the order list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderQuery {
    pub page: u32,
    pub limit: u32,
    /// Free-text filter passed through to the server.
    pub filter: Option<String>,
    pub status: Option<OrderStatus>,
}

impl OrderQuery {
    /// First page, no filters.
    #[must_use]
    pub const fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            filter: None,
            status: None,
        }
    }

    /// The filter as sent: trimmed, `None` when blank.
    #[must_use]
    pub fn effective_filter(&self) -> Option<&str> {
        self.filter.as_deref().map(str::trim).filter(|f| !f.is_empty())
    }

    /// The status as sent: `None` when blank.
    #[must_use]
    pub fn effective_status(&self) -> Option<&OrderStatus> {
        self.status.as_ref().filter(|s| !s.is_blank())
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = page_query(self.page, self.limit);
        if let Some(filter) = self.effective_filter() {
            params.push(("filter", filter.to_string()));
        }
        if let Some(status) = self.effective_status() {
            params.push(("status", status.as_str().to_string()));
        }
        params
    }
}

impl ApiClient {
    /// List orders.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the envelope is malformed.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, query: &OrderQuery) -> Result<Page<Order>, ApiError> {
        let body = self.get("admin/orders", &query.params()).await?;
        page(body)
    }

    /// Set an order's status.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip_all, fields(order_id = %id, status = %status))]
    pub async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order, ApiError> {
        let body = self
            .put(
                &format!("admin/orders/{id}/status"),
                &OrderStatusUpdate { status },
            )
            .await?;
        record(body)
    }
}
