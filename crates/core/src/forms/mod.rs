//! Client-side form validation.
//!
//! Each form is a plain struct holding what the user typed. `validate()`
//! either returns the request body to send or a [`ValidationError`] whose
//! message is shown to the user. A form that fails validation never reaches
//! the network.

mod error;
pub mod location;
pub mod meal;
pub mod password;
pub mod profile;

pub use error::ValidationError;
pub use location::{LocationForm, LocationInput};
pub use meal::{ImageUpload, MAX_OTHER_IMAGES, MealDraft, MealForm};
pub use password::{
    ChangePasswordForm, ChangePasswordRequest, ForgotPasswordForm, LoginForm, LoginRequest,
    MIN_PASSWORD_LENGTH, ResetPasswordForm, ResetPasswordRequest,
};
pub use profile::{ProfileForm, ProfileUpdate};

/// Trim a text field and return `None` when nothing is left.
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
