//! Validation errors.

use thiserror::Error;

use crate::types::{EmailError, PriceError};

/// A form was rejected before dispatch. The `Display` text is what the
/// dashboard shows in its error notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required fields are empty.
    #[error("Please fill in all fields")]
    MissingFields,

    /// A specific field is empty.
    #[error("{0} is required")]
    Required(&'static str),

    /// New password and its confirmation differ (change-password form).
    #[error("New passwords do not match")]
    NewPasswordMismatch,

    /// New password and its confirmation differ (reset-password form).
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// New password is shorter than the minimum.
    #[error("Password must be at least {min} characters long")]
    PasswordTooShort {
        /// Minimum length in characters.
        min: usize,
    },

    /// Email address is empty or malformed.
    #[error(transparent)]
    Email(#[from] EmailError),

    /// Fewer than six OTP digits were entered.
    #[error("Please enter a complete OTP")]
    IncompleteOtp,

    /// OTP contains something other than digits.
    #[error("OTP must contain digits only")]
    NonDigitOtp,

    /// Price field is not a valid amount.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Date field is not `YYYY-MM-DD`.
    #[error("{0} must be a date in YYYY-MM-DD format")]
    InvalidDate(&'static str),

    /// Too many gallery images for a meal.
    #[error("A meal can have at most {max} additional images")]
    TooManyImages {
        /// Maximum number of additional images.
        max: usize,
    },

    /// Uploaded file is not an image.
    #[error("'{0}' is not a supported image")]
    UnsupportedImage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_dashboard_notices() {
        assert_eq!(
            ValidationError::MissingFields.to_string(),
            "Please fill in all fields"
        );
        assert_eq!(
            ValidationError::PasswordTooShort { min: 6 }.to_string(),
            "Password must be at least 6 characters long"
        );
        assert_eq!(
            ValidationError::Email(EmailError::Empty).to_string(),
            "Please enter your email address"
        );
        assert_eq!(ValidationError::Required("Name").to_string(), "Name is required");
    }
}
