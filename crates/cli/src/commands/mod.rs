//! Subcommand implementations.
//!
//! Each command authenticates (unless it is part of the password-reset
//! flow), calls the matching [`Console`] action and prints the result as
//! JSON.

pub mod account;
pub mod locations;
pub mod meals;
pub mod orders;
pub mod session;
pub mod users;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use lunchdesk_client::{ActionError, Console, DeleteOutcome, Session};
use lunchdesk_core::ValidationError;
use lunchdesk_core::forms::{ImageUpload, LoginForm};
use secrecy::SecretString;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Neither a token nor email and password were supplied.
    #[error("Not signed in: set LUNCHDESK_TOKEN, or LUNCHDESK_EMAIL and LUNCHDESK_PASSWORD")]
    NotSignedIn,

    /// An action was rejected or failed.
    #[error(transparent)]
    Action(#[from] ActionError),

    /// Input was rejected before any request was made.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// A local file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output could not be encoded.
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Credentials from flags or the environment.
pub struct Credentials {
    pub token: Option<SecretString>,
    pub email: Option<String>,
    pub password: Option<SecretString>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Establish a session from a token, or by signing in.
pub async fn authenticate(console: &Console, credentials: Credentials) -> Result<(), CliError> {
    if let Some(token) = credentials.token {
        console.resume(Session::from_token(token)).await;
        return Ok(());
    }
    match (credentials.email, credentials.password) {
        (Some(email), Some(password)) => {
            console.sign_in(LoginForm { email, password }).await?;
            Ok(())
        }
        _ => Err(CliError::NotSignedIn),
    }
}

/// Print `value` to stdout as pretty JSON.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the outcome of a delete.
pub fn print_deleted(outcome: &DeleteOutcome) -> Result<(), CliError> {
    match outcome {
        DeleteOutcome::Deleted(ack) => print_json(&serde_json::json!({ "deleted": true, "ack": ack })),
        DeleteOutcome::Cancelled => print_json(&serde_json::json!({ "deleted": false })),
    }
}

/// Confirmation callback for deletes: `--yes` accepts, otherwise ask on
/// the terminal.
pub fn confirmer(yes: bool) -> impl FnOnce(&str) -> bool {
    move |message| yes || ask(message)
}

#[allow(clippy::print_stderr)]
fn ask(message: &str) -> bool {
    eprint!("{message} [y/N] ");
    if std::io::stderr().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Read an image file for upload.
pub fn read_image(path: &Path) -> Result<ImageUpload, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImageUpload::from_bytes(file_name, bytes)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_yes_skips_prompt() {
        assert!(confirmer(true)("Are you sure you want to delete this meal?"));
    }

    #[test]
    fn test_read_image_missing_file() {
        let err = read_image(Path::new("/nonexistent/lunch.png")).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[test]
    fn test_credentials_debug_redacts() {
        let credentials = Credentials {
            token: Some(SecretString::from("tok-secret")),
            email: None,
            password: Some(SecretString::from("pw-secret")),
        };
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("tok-secret"));
        assert!(!debug.contains("pw-secret"));
    }
}
