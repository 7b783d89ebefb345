//! Weekdays on which a meal can be offered.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The five service days. Meals are never offered at weekends.
///
/// Serialized with a capitalised name (`"Monday"`), which is also what the
/// `day` query parameter of the meal list expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MealDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

/// Returned when a string does not name one of the five service days.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a service day (expected Monday to Friday)")]
pub struct ParseMealDayError(pub String);

impl MealDay {
    /// All service days in week order.
    pub const ALL: [Self; 5] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
    ];

    /// Capitalised day name as used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
        }
    }
}

impl fmt::Display for MealDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsing is case-insensitive so route segments like `monday` work.
impl FromStr for MealDay {
    type Err = ParseMealDayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseMealDayError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("monday".parse::<MealDay>().unwrap(), MealDay::Monday);
        assert_eq!("FRIDAY".parse::<MealDay>().unwrap(), MealDay::Friday);
        assert_eq!(" Wednesday ".parse::<MealDay>().unwrap(), MealDay::Wednesday);
    }

    #[test]
    fn test_weekend_is_rejected() {
        assert!("Saturday".parse::<MealDay>().is_err());
        assert!("sunday".parse::<MealDay>().is_err());
        assert!("".parse::<MealDay>().is_err());
    }

    #[test]
    fn test_wire_format_is_capitalised() {
        assert_eq!(
            serde_json::to_string(&MealDay::Thursday).unwrap(),
            "\"Thursday\""
        );
        assert!(serde_json::from_str::<MealDay>("\"Saturday\"").is_err());
    }
}
