//! Admin profile.

use serde::{Deserialize, Serialize};

use super::Record;

/// The signed-in admin's profile. One record per admin account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub name: Option<String>,
    pub company_name: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
}

impl Record for Profile {
    const SINGULAR: &'static str = "profile";
}
