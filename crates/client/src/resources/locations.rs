//! Delivery location operations.

use lunchdesk_core::forms::LocationInput;
use lunchdesk_core::{Ack, Location, LocationId, LocationStatusUpdate, Page};
use tracing::instrument;

use super::{ack, page, page_query, record};
use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// List locations.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the envelope is malformed.
    #[instrument(skip(self))]
    pub async fn list_locations(&self, page_number: u32, limit: u32) -> Result<Page<Location>, ApiError> {
        let body = self
            .get("admin/locations", &page_query(page_number, limit))
            .await?;
        page(body)
    }

    /// Create a location.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip_all, fields(name = %input.name))]
    pub async fn create_location(&self, input: &LocationInput) -> Result<Location, ApiError> {
        let body = self.post("admin/locations", input).await?;
        record(body)
    }

    /// Replace a location's name and address.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip_all, fields(location_id = %id))]
    pub async fn update_location(
        &self,
        id: &LocationId,
        input: &LocationInput,
    ) -> Result<Location, ApiError> {
        let body = self.put(&format!("admin/locations/{id}"), input).await?;
        record(body)
    }

    /// Activate or deactivate a location. Only `isActive` is sent.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip_all, fields(location_id = %id, is_active))]
    pub async fn set_location_status(&self, id: &LocationId, is_active: bool) -> Result<Location, ApiError> {
        let body = self
            .put(
                &format!("admin/locations/{id}"),
                &LocationStatusUpdate { is_active },
            )
            .await?;
        record(body)
    }

    /// Delete a location.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip_all, fields(location_id = %id))]
    pub async fn delete_location(&self, id: &LocationId) -> Result<Ack, ApiError> {
        let body = self.delete(&format!("admin/locations/{id}")).await?;
        Ok(ack(body))
    }
}
