//! Customer accounts (read and delete only from the dashboard).

use serde::{Deserialize, Serialize};

use super::{Listed, Record};
use crate::types::UserId;

/// A customer with order counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub total_orders: u32,
    #[serde(default)]
    pub delivered_orders: u32,
    #[serde(default)]
    pub pending_orders: u32,
}

impl Customer {
    /// Last four characters of the id, as shown in the user table.
    #[must_use]
    pub fn short_id(&self) -> &str {
        let id = self.id.as_str();
        let start = id
            .char_indices()
            .rev()
            .nth(3)
            .map_or(0, |(index, _)| index);
        id.get(start..).unwrap_or(id)
    }
}

impl Record for Customer {
    const SINGULAR: &'static str = "user";
}

impl Listed for Customer {
    const COLLECTION: &'static str = "users";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: &str) -> Customer {
        Customer {
            id: UserId::new(id),
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            total_orders: 0,
            delivered_orders: 0,
            pending_orders: 0,
        }
    }

    #[test]
    fn test_short_id() {
        assert_eq!(customer("65f0a1b2c3d4").short_id(), "c3d4");
        assert_eq!(customer("ab").short_id(), "ab");
    }
}
