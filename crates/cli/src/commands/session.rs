//! `login` and `stats`.

use lunchdesk_client::Console;
use lunchdesk_core::forms::LoginForm;
use secrecy::ExposeSecret;
use serde_json::json;

use super::{CliError, Credentials, print_json};

/// Sign in with email and password and print the token.
pub async fn login(console: &Console, credentials: Credentials) -> Result<(), CliError> {
    let (Some(email), Some(password)) = (credentials.email, credentials.password) else {
        return Err(CliError::NotSignedIn);
    };
    let session = console.sign_in(LoginForm { email, password }).await?;
    print_json(&json!({
        "token": session.token().expose_secret(),
        "userId": session.user_id,
        "displayName": session.display_name,
        "email": session.email,
    }))
}

pub async fn stats(console: &Console, credentials: Credentials) -> Result<(), CliError> {
    super::authenticate(console, credentials).await?;
    let stats = console.dashboard_stats().await?;
    print_json(&*stats)
}
