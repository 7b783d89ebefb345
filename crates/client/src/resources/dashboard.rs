//! Dashboard summary.

use lunchdesk_core::DashboardStats;
use tracing::instrument;

use super::record;
use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Fetch the summary counters shown on the dashboard home.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        let body = self.get("admin/dashboard", &[]).await?;
        record(body)
    }
}
