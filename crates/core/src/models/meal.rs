//! Meals offered on a given weekday.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Listed, Record};
use crate::types::{MealDay, MealId, Price};

/// A meal on the weekly menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    #[serde(rename = "_id", alias = "id")]
    pub id: MealId,
    pub description: String,
    pub price: Price,
    pub available_day: MealDay,
    #[serde(default)]
    pub main_image: Option<String>,
    /// Gallery image URLs; the dashboard never uploads more than
    /// [`crate::forms::MAX_OTHER_IMAGES`].
    #[serde(default)]
    pub other_images: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Meal {
    /// Short title for list rows: the first two words of the description.
    #[must_use]
    pub fn short_title(&self) -> String {
        self.description
            .split_whitespace()
            .take(2)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Record for Meal {
    const SINGULAR: &'static str = "meal";
}

impl Listed for Meal {
    const COLLECTION: &'static str = "meals";
}
