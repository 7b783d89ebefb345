//! `password` and `profile` subcommands.

use std::path::PathBuf;

use clap::Subcommand;
use lunchdesk_client::Console;
use lunchdesk_core::OtpInput;
use lunchdesk_core::forms::{
    ChangePasswordForm, ForgotPasswordForm, ProfileForm, ResetPasswordForm,
};
use lunchdesk_core::{Ack, ValidationError};
use secrecy::SecretString;
use serde_json::json;

use super::{CliError, Credentials, authenticate, print_json, read_image};

#[derive(Subcommand)]
pub enum PasswordAction {
    /// Email a one-time password
    Forgot {
        #[arg(long)]
        email: String,
        /// Send the code again
        #[arg(long)]
        resend: bool,
    },
    /// Set a new password with the emailed one-time password
    Reset {
        #[arg(long)]
        email: String,
        /// The six-digit code
        #[arg(long)]
        otp: String,
        #[arg(long, env = "LUNCHDESK_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
        #[arg(long, env = "LUNCHDESK_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm_password: String,
    },
    /// Change the signed-in admin's password
    Change {
        #[arg(long, env = "LUNCHDESK_CURRENT_PASSWORD", hide_env_values = true)]
        current_password: String,
        #[arg(long, env = "LUNCHDESK_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
        #[arg(long, env = "LUNCHDESK_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm_password: String,
    },
}

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Update profile fields. Omitted optional fields are cleared.
    Update {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        company_name: String,
        #[arg(long, default_value = "")]
        phone_number: String,
        #[arg(long, default_value = "")]
        gender: String,
        /// `YYYY-MM-DD`
        #[arg(long, default_value = "")]
        date_of_birth: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

pub async fn password(console: &Console, credentials: Credentials, action: PasswordAction) -> Result<(), CliError> {
    match action {
        PasswordAction::Forgot { email, resend } => {
            let form = ForgotPasswordForm { email };
            let ack = if resend {
                let email = form.validate()?;
                console.resend_otp(&email).await?
            } else {
                console.request_password_reset(&form).await?;
                Ack::default()
            };
            print_json(&json!({ "sent": true, "ack": ack }))
        }
        PasswordAction::Reset {
            email,
            otp,
            new_password,
            confirm_password,
        } => {
            let otp = otp_code(&otp)?;
            let ack = console
                .reset_password(ResetPasswordForm {
                    email,
                    otp,
                    new_password: SecretString::from(new_password),
                    confirm_password: SecretString::from(confirm_password),
                })
                .await?;
            print_json(&json!({ "reset": true, "ack": ack }))
        }
        PasswordAction::Change {
            current_password,
            new_password,
            confirm_password,
        } => {
            authenticate(console, credentials).await?;
            let ack = console
                .change_password(ChangePasswordForm {
                    current_password: SecretString::from(current_password),
                    new_password: SecretString::from(new_password),
                    confirm_password: SecretString::from(confirm_password),
                })
                .await?;
            print_json(&json!({ "changed": true, "ack": ack }))
        }
    }
}

pub async fn profile(console: &Console, credentials: Credentials, action: ProfileAction) -> Result<(), CliError> {
    authenticate(console, credentials).await?;

    match action {
        ProfileAction::Update {
            name,
            company_name,
            phone_number,
            gender,
            date_of_birth,
            address,
            image,
        } => {
            let form = ProfileForm {
                name,
                company_name,
                phone_number,
                gender,
                date_of_birth,
                address,
                profile_image: image.as_deref().map(read_image).transpose()?,
            };
            print_json(&console.update_profile(&form).await?)
        }
    }
}

/// Feed a typed code through the OTP cells as a paste would.
fn otp_code(code: &str) -> Result<String, CliError> {
    let mut input = OtpInput::new();
    if !input.paste(code) {
        return Err(ValidationError::NonDigitOtp.into());
    }
    Ok(input.submit()?.as_str().to_string())
}
