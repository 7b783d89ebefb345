//! Profile settings form.

use chrono::NaiveDate;

use super::meal::ImageUpload;
use super::{ValidationError, non_blank};
use crate::models::Profile;

/// The settings screen.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub name: String,
    pub company_name: String,
    pub phone_number: String,
    pub gender: String,
    pub date_of_birth: String,
    pub address: String,
    pub profile_image: Option<ImageUpload>,
}

/// Validated multipart payload for `PUT /admin/profile`. Blank optional
/// fields are omitted from the request.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: String,
    pub company_name: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub profile_image: Option<ImageUpload>,
}

impl ProfileForm {
    /// Prefill from the stored profile.
    #[must_use]
    pub fn for_profile(profile: &Profile) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            name: text(&profile.name),
            company_name: text(&profile.company_name),
            phone_number: text(&profile.phone_number),
            gender: text(&profile.gender),
            date_of_birth: text(&profile.date_of_birth),
            address: text(&profile.address),
            profile_image: None,
        }
    }

    /// Validate the form.
    ///
    /// # Errors
    ///
    /// [`ValidationError::Required`] if the name is blank, or
    /// [`ValidationError::InvalidDate`] if the date of birth is not
    /// `YYYY-MM-DD`.
    pub fn validate(&self) -> Result<ProfileUpdate, ValidationError> {
        let name = non_blank(&self.name).ok_or(ValidationError::Required("Name"))?;
        let date_of_birth = non_blank(&self.date_of_birth)
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|_| ValidationError::InvalidDate("Date of birth"))
            })
            .transpose()?;

        Ok(ProfileUpdate {
            name,
            company_name: non_blank(&self.company_name),
            phone_number: non_blank(&self.phone_number),
            gender: non_blank(&self.gender),
            date_of_birth,
            address: non_blank(&self.address),
            profile_image: self.profile_image.clone(),
        })
    }
}
