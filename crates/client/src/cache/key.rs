//! Query keys.

use core::fmt;

use lunchdesk_core::{MealDay, OrderStatus, UserId};

use crate::resources::OrderQuery;

/// Address of one cached query: the resource name followed by its filter
/// and pagination parameters, e.g. `meals/Monday/1/10`.
///
/// Invalidation works on prefixes: [`QueryKey::meals_for_day`] matches
/// every page of that day and nothing else.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    /// Build a key from raw segments.
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The key's segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Whether `prefix` addresses this key or one of its ancestors.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }

    #[must_use]
    pub fn dashboard_stats() -> Self {
        Self::new(["dashboard-stats"])
    }

    #[must_use]
    pub fn meals(day: MealDay, page: u32, limit: u32) -> Self {
        Self::new([
            "meals".to_string(),
            day.to_string(),
            page.to_string(),
            limit.to_string(),
        ])
    }

    /// Every cached page of meals for `day`.
    #[must_use]
    pub fn meals_for_day(day: MealDay) -> Self {
        Self::new(["meals", day.as_str()])
    }

    #[must_use]
    pub fn locations(page: u32, limit: u32) -> Self {
        Self::new(["locations".to_string(), page.to_string(), limit.to_string()])
    }

    #[must_use]
    pub fn all_locations() -> Self {
        Self::new(["locations"])
    }

    #[must_use]
    pub fn users(page: u32, limit: u32) -> Self {
        Self::new(["users".to_string(), page.to_string(), limit.to_string()])
    }

    /// A single customer. Lives under `users` so deleting any user drops it.
    #[must_use]
    pub fn user(id: &UserId) -> Self {
        Self::new(["users", "detail", id.as_str()])
    }

    #[must_use]
    pub fn all_users() -> Self {
        Self::new(["users"])
    }

    /// Built from the filters actually sent, so queries that produce the
    /// same request share one entry.
    #[must_use]
    pub fn orders(query: &OrderQuery) -> Self {
        Self::new([
            "orders".to_string(),
            query.effective_filter().unwrap_or_default().to_string(),
            query
                .effective_status()
                .map(OrderStatus::as_str)
                .unwrap_or_default()
                .to_string(),
            query.page.to_string(),
            query.limit.to_string(),
        ])
    }

    #[must_use]
    pub fn all_orders() -> Self {
        Self::new(["orders"])
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_prefix_matches_only_that_day() {
        let monday = QueryKey::meals(MealDay::Monday, 2, 10);
        let tuesday = QueryKey::meals(MealDay::Tuesday, 1, 10);
        let prefix = QueryKey::meals_for_day(MealDay::Monday);

        assert!(monday.starts_with(&prefix));
        assert!(!tuesday.starts_with(&prefix));
        assert!(!QueryKey::all_locations().starts_with(&prefix));
    }

    #[test]
    fn test_resource_prefix_matches_every_page() {
        assert!(QueryKey::locations(3, 10).starts_with(&QueryKey::all_locations()));
        assert!(QueryKey::user(&UserId::new("u1")).starts_with(&QueryKey::all_users()));
        assert!(QueryKey::orders(&OrderQuery::new(10)).starts_with(&QueryKey::all_orders()));
        assert!(!QueryKey::dashboard_stats().starts_with(&QueryKey::all_users()));
    }

    #[test]
    fn test_prefix_is_segment_based() {
        let key = QueryKey::new(["usersettings"]);
        assert!(!key.starts_with(&QueryKey::all_users()));
    }

    #[test]
    fn test_blank_order_filters_share_a_key() {
        let plain = QueryKey::orders(&OrderQuery::new(10));
        for (filter, status) in [
            (Some("  "), None),
            (Some(""), Some("")),
            (None, Some(" ")),
        ] {
            let mut query = OrderQuery::new(10);
            query.filter = filter.map(str::to_string);
            query.status = status.map(OrderStatus::new);
            assert_eq!(QueryKey::orders(&query), plain);
        }

        let mut padded = OrderQuery::new(10);
        padded.filter = Some(" today ".to_string());
        let mut trimmed = OrderQuery::new(10);
        trimmed.filter = Some("today".to_string());
        assert_eq!(QueryKey::orders(&padded), QueryKey::orders(&trimmed));
        assert_ne!(QueryKey::orders(&trimmed), plain);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            QueryKey::meals(MealDay::Friday, 1, 10).to_string(),
            "meals/Friday/1/10"
        );
    }
}
