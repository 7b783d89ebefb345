//! Unauthenticated auth endpoints: login and password reset.

use lunchdesk_core::forms::{LoginRequest, ResetPasswordRequest};
use lunchdesk_core::{Ack, Email, LoginResponse};
use serde::Serialize;
use tracing::instrument;

use super::ack;
use crate::client::ApiClient;
use crate::error::ApiError;

#[derive(Serialize)]
struct ForgotPasswordBody<'a> {
    email: &'a Email,
}

impl ApiClient {
    /// Exchange credentials for a bearer token.
    ///
    /// Does not touch the session store; see
    /// [`Console::sign_in`](crate::Console::sign_in).
    ///
    /// # Errors
    ///
    /// Returns error if the credentials are rejected, the API request fails
    /// or the response carries no token.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = self.post("auth/login", request).await?;
        let response: LoginResponse = serde_json::from_value(body)?;
        if response.token.trim().is_empty() {
            return Err(ApiError::InvalidResponse(
                "login response has an empty token".to_string(),
            ));
        }
        Ok(response)
    }

    /// Ask the server to email a one-time password.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn forgot_password(&self, email: &Email) -> Result<Ack, ApiError> {
        let body = self
            .post("auth/forgot-password", &ForgotPasswordBody { email })
            .await?;
        Ok(ack(body))
    }

    /// Set a new password using the emailed one-time password.
    ///
    /// # Errors
    ///
    /// Returns error if the OTP is rejected or the API request fails.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<Ack, ApiError> {
        let body = self.post("auth/reset-password", request).await?;
        Ok(ack(body))
    }
}
