//! Customer (user) operations.

use lunchdesk_core::{Ack, Customer, Page, UserId};
use tracing::instrument;

use super::{ack, page, page_query, record};
use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// List customers with their order counters.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the envelope is malformed.
    #[instrument(skip(self))]
    pub async fn list_users(&self, page_number: u32, limit: u32) -> Result<Page<Customer>, ApiError> {
        let body = self.get("admin/users", &page_query(page_number, limit)).await?;
        page(body)
    }

    /// Fetch one customer.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn get_user(&self, id: &UserId) -> Result<Customer, ApiError> {
        let body = self.get(&format!("admin/users/{id}"), &[]).await?;
        record(body)
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn delete_user(&self, id: &UserId) -> Result<Ack, ApiError> {
        let body = self.delete(&format!("admin/users/{id}")).await?;
        Ok(ack(body))
    }
}
