//! Delivery locations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Listed, Record};
use crate::types::LocationId;

/// A delivery location managed from the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(rename = "_id", alias = "id")]
    pub id: LocationId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_by: Option<Creator>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Admin account that created a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub name: String,
    pub email: String,
}

/// Body of the status toggle (`PUT /admin/locations/:id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStatusUpdate {
    pub is_active: bool,
}

impl Location {
    /// Label shown in the status column.
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        if self.is_active { "Active" } else { "Inactive" }
    }
}

impl Record for Location {
    const SINGULAR: &'static str = "location";
}

impl Listed for Location {
    const COLLECTION: &'static str = "locations";
}
