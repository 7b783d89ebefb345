//! Admin profile and signed-in password change.

use lunchdesk_core::forms::{ChangePasswordRequest, ProfileUpdate};
use lunchdesk_core::{Ack, Profile};
use reqwest::multipart::Form;
use tracing::instrument;

use super::meals::image_part;
use super::{ack, record};
use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Update the signed-in admin's profile.
    ///
    /// # Errors
    ///
    /// Returns error if the image part is invalid or the API request fails.
    #[instrument(skip_all)]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        let body = self
            .put_multipart("admin/profile", profile_form(update)?)
            .await?;
        record(body)
    }

    /// Change the signed-in admin's password.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails (including a wrong current
    /// password).
    #[instrument(skip_all)]
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<Ack, ApiError> {
        let body = self.put("admin/change-password", request).await?;
        Ok(ack(body))
    }
}

fn profile_form(update: &ProfileUpdate) -> Result<Form, ApiError> {
    let optional = [
        ("companyName", update.company_name.clone()),
        ("phoneNumber", update.phone_number.clone()),
        ("gender", update.gender.clone()),
        (
            "dateOfBirth",
            update.date_of_birth.map(|d| d.format("%Y-%m-%d").to_string()),
        ),
        ("address", update.address.clone()),
    ];

    let mut form = Form::new().text("name", update.name.clone());
    for (name, value) in optional {
        if let Some(value) = value {
            form = form.text(name, value);
        }
    }
    if let Some(image) = &update.profile_image {
        form = form.part("profileImage", image_part(image)?);
    }
    Ok(form)
}
