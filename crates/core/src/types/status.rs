//! Order status.
//!
//! The status vocabulary belongs to the server; the dashboard only displays
//! it and sends a new value back. It is therefore kept as an opaque string.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An order status as reported by the admin API (e.g. `"pending"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderStatus(String);

impl OrderStatus {
    /// Wrap a status value. Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(status: impl AsRef<str>) -> Self {
        Self(status.as_ref().trim().to_owned())
    }

    /// The status string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the status is blank and so cannot be sent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderStatus {
    fn from(status: &str) -> Self {
        Self::new(status)
    }
}
