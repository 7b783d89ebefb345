//! Newtype IDs for type-safe entity references.
//!
//! The admin API identifies every record with an opaque string id (the `_id`
//! field on the wire). Use the `define_id!` macro to create wrappers that
//! prevent passing a meal id where a location id is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use lunchdesk_core::define_id;
/// define_id!(TrayId);
/// define_id!(DriverId);
///
/// let tray = TrayId::new("665f1c2ab3");
/// assert_eq!(tray.as_str(), "665f1c2ab3");
///
/// // These are different types, so this won't compile:
/// // let _: DriverId = tray;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(AdminId);
define_id!(LocationId);
define_id!(MealId);
define_id!(UserId);
define_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_transparent_on_the_wire() {
        let id = LocationId::new("64f0a1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"64f0a1\"");

        let parsed: MealId = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(parsed.as_str(), "abc123");
    }

    #[test]
    fn test_id_display() {
        let id = OrderId::from("ord-7");
        assert_eq!(id.to_string(), "ord-7");
        assert_eq!(id.into_inner(), "ord-7");
    }
}
