//! Login, change-password and password-reset forms.

use secrecy::{ExposeSecret, SecretString};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::ValidationError;
use crate::otp::Otp;
use crate::types::Email;

/// Minimum length of a new password, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;

fn is_empty(secret: &SecretString) -> bool {
    secret.expose_secret().is_empty()
}

fn check_new_password(
    new_password: &SecretString,
    confirm_password: &SecretString,
    mismatch: ValidationError,
) -> Result<(), ValidationError> {
    if new_password.expose_secret() != confirm_password.expose_secret() {
        return Err(mismatch);
    }
    if new_password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    Ok(())
}

// =============================================================================
// Login
// =============================================================================

/// Credentials typed into the login screen.
#[derive(Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

/// Body of `POST /auth/login`.
#[derive(Debug)]
pub struct LoginRequest {
    pub email: Email,
    pub password: SecretString,
}

impl LoginForm {
    /// Validate the credentials.
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingFields`] if either field is empty, or
    /// [`ValidationError::Email`] if the email is malformed.
    pub fn validate(self) -> Result<LoginRequest, ValidationError> {
        if self.email.trim().is_empty() || is_empty(&self.password) {
            return Err(ValidationError::MissingFields);
        }
        Ok(LoginRequest {
            email: Email::parse(&self.email)?,
            password: self.password,
        })
    }
}

impl Serialize for LoginRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LoginRequest", 2)?;
        state.serialize_field("email", &self.email)?;
        state.serialize_field("password", self.password.expose_secret())?;
        state.end()
    }
}

// =============================================================================
// Change password (signed in)
// =============================================================================

/// The change-password screen.
#[derive(Debug)]
pub struct ChangePasswordForm {
    pub current_password: SecretString,
    pub new_password: SecretString,
    pub confirm_password: SecretString,
}

/// Body of `PUT /admin/change-password`.
#[derive(Debug)]
pub struct ChangePasswordRequest {
    pub current_password: SecretString,
    pub new_password: SecretString,
}

impl ChangePasswordForm {
    /// Validate in the order the dashboard reports problems: empty fields,
    /// then mismatch, then length.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(self) -> Result<ChangePasswordRequest, ValidationError> {
        if is_empty(&self.current_password)
            || is_empty(&self.new_password)
            || is_empty(&self.confirm_password)
        {
            return Err(ValidationError::MissingFields);
        }
        check_new_password(
            &self.new_password,
            &self.confirm_password,
            ValidationError::NewPasswordMismatch,
        )?;
        Ok(ChangePasswordRequest {
            current_password: self.current_password,
            new_password: self.new_password,
        })
    }
}

impl Serialize for ChangePasswordRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ChangePasswordRequest", 2)?;
        state.serialize_field("currentPassword", self.current_password.expose_secret())?;
        state.serialize_field("newPassword", self.new_password.expose_secret())?;
        state.end()
    }
}

// =============================================================================
// Forgot / reset password
// =============================================================================

/// The forgot-password screen: one email field.
#[derive(Debug, Clone)]
pub struct ForgotPasswordForm {
    pub email: String,
}

impl ForgotPasswordForm {
    /// Validate the email address the OTP will be sent to.
    ///
    /// # Errors
    ///
    /// [`ValidationError::Email`] if the address is empty or malformed.
    pub fn validate(&self) -> Result<Email, ValidationError> {
        Ok(Email::parse(&self.email)?)
    }
}

/// The reset-password screen, reached after the OTP was entered.
#[derive(Debug)]
pub struct ResetPasswordForm {
    pub email: String,
    pub otp: String,
    pub new_password: SecretString,
    pub confirm_password: SecretString,
}

/// Body of `POST /auth/reset-password`.
#[derive(Debug)]
pub struct ResetPasswordRequest {
    pub email: Email,
    pub otp: Otp,
    pub new_password: SecretString,
}

impl ResetPasswordForm {
    /// Validate the new password, then the email and OTP carried over from
    /// the previous steps.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    pub fn validate(self) -> Result<ResetPasswordRequest, ValidationError> {
        if is_empty(&self.new_password) || is_empty(&self.confirm_password) {
            return Err(ValidationError::MissingFields);
        }
        check_new_password(
            &self.new_password,
            &self.confirm_password,
            ValidationError::PasswordMismatch,
        )?;
        Ok(ResetPasswordRequest {
            email: Email::parse(&self.email)?,
            otp: Otp::parse(&self.otp)?,
            new_password: self.new_password,
        })
    }
}

impl Serialize for ResetPasswordRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResetPasswordRequest", 3)?;
        state.serialize_field("email", &self.email)?;
        state.serialize_field("otp", self.otp.as_str())?;
        state.serialize_field("newPassword", self.new_password.expose_secret())?;
        state.end()
    }
}
