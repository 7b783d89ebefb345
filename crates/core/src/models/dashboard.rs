//! Dashboard summary counters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Record;

/// Summary returned by `GET /admin/dashboard`. Missing counters are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_revenue: Decimal,
    pub total_users: u64,
    pub todays_orders: u64,
}

impl Record for DashboardStats {
    const SINGULAR: &'static str = "stats";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_counters_default_to_zero() {
        let stats: DashboardStats = serde_json::from_str(r#"{"totalUsers": 41200}"#).unwrap();
        assert_eq!(stats.total_users, 41_200);
        assert_eq!(stats.todays_orders, 0);
        assert_eq!(stats.total_revenue, Decimal::ZERO);
    }
}
