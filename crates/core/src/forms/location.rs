//! Location create/edit form.

use serde::{Deserialize, Serialize};

use super::{ValidationError, non_blank};
use crate::models::Location;

/// The add/edit location modal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationForm {
    pub name: String,
    pub address: String,
}

/// Body of `POST /admin/locations` and `PUT /admin/locations/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInput {
    pub name: String,
    pub address: String,
}

impl LocationForm {
    /// Prefill the form from an existing location.
    #[must_use]
    pub fn for_location(location: &Location) -> Self {
        Self {
            name: location.name.clone(),
            address: location.address.clone(),
        }
    }

    /// Trim and check both fields.
    ///
    /// # Errors
    ///
    /// [`ValidationError::Required`] naming the first empty field.
    pub fn validate(&self) -> Result<LocationInput, ValidationError> {
        let name = non_blank(&self.name).ok_or(ValidationError::Required("Name"))?;
        let address = non_blank(&self.address).ok_or(ValidationError::Required("Address"))?;
        Ok(LocationInput { name, address })
    }
}
