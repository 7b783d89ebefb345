//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input is empty (after trimming).
    #[error("Please enter your email address")]
    Empty,
    /// The input is longer than [`Email::MAX_LENGTH`].
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input is not `local@domain`.
    #[error("'{0}' is not a valid email address")]
    Malformed(String),
}

/// An email address as typed into a login or password-reset form.
///
/// Only the shape is checked: one `@` with a non-empty local part and a
/// non-empty domain, no whitespace. Surrounding whitespace is trimmed.
///
/// ```
/// use lunchdesk_core::Email;
///
/// assert!(Email::parse("admin@lunch.example").is_ok());
/// assert!(Email::parse("  admin@lunch.example ").is_ok());
/// assert!(Email::parse("").is_err());
/// assert!(Email::parse("admin").is_err());
/// assert!(Email::parse("a@b@c").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from user input.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError`] if the trimmed input is empty, too long, or not
    /// of the form `local@domain`.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let malformed = || EmailError::Malformed(s.to_owned());
        let (local, domain) = s.split_once('@').ok_or_else(malformed)?;
        if local.is_empty()
            || domain.is_empty()
            || domain.contains('@')
            || s.chars().any(char::is_whitespace)
        {
            return Err(malformed());
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Email` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_input() {
        let email = Email::parse("  admin@lunch.example\n").unwrap();
        assert_eq!(email.as_str(), "admin@lunch.example");
    }

    #[test]
    fn test_parse_empty_uses_form_message() {
        let err = Email::parse("   ").unwrap_err();
        assert_eq!(err, EmailError::Empty);
        assert_eq!(err.to_string(), "Please enter your email address");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["no-at", "@domain", "local@", "a@b@c", "a b@c"] {
            assert!(
                matches!(Email::parse(input), Err(EmailError::Malformed(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }
}
