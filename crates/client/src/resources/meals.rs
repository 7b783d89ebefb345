//! Meal operations. Create and update are multipart because they carry
//! image files.

use lunchdesk_core::forms::{ImageUpload, MealDraft};
use lunchdesk_core::{Ack, Meal, MealDay, MealId, Page};
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use super::{ack, page, page_query, record};
use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// List meals, optionally for one service day.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails or the envelope is malformed.
    #[instrument(skip(self))]
    pub async fn list_meals(
        &self,
        page_number: u32,
        limit: u32,
        day: Option<MealDay>,
    ) -> Result<Page<Meal>, ApiError> {
        let mut query = page_query(page_number, limit);
        if let Some(day) = day {
            query.push(("day", day.as_str().to_string()));
        }
        let body = self.get("admin/meals", &query).await?;
        page(body)
    }

    /// Create a meal.
    ///
    /// # Errors
    ///
    /// Returns error if an image part is invalid or the API request fails.
    #[instrument(skip_all, fields(day = %draft.available_day))]
    pub async fn create_meal(&self, draft: &MealDraft) -> Result<Meal, ApiError> {
        let body = self.post_multipart("admin/meals", meal_form(draft)?).await?;
        record(body)
    }

    /// Update a meal. Images are only sent when newly selected.
    ///
    /// # Errors
    ///
    /// Returns error if an image part is invalid or the API request fails.
    #[instrument(skip_all, fields(meal_id = %id, day = %draft.available_day))]
    pub async fn update_meal(&self, id: &MealId, draft: &MealDraft) -> Result<Meal, ApiError> {
        let body = self
            .put_multipart(&format!("admin/meals/{id}"), meal_form(draft)?)
            .await?;
        record(body)
    }

    /// Delete a meal.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip_all, fields(meal_id = %id))]
    pub async fn delete_meal(&self, id: &MealId) -> Result<Ack, ApiError> {
        let body = self.delete(&format!("admin/meals/{id}")).await?;
        Ok(ack(body))
    }
}

fn meal_form(draft: &MealDraft) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("description", draft.description.clone())
        .text("price", draft.price.to_string())
        .text("availableDay", draft.available_day.as_str());

    if let Some(image) = &draft.main_image {
        form = form.part("mainImage", image_part(image)?);
    }
    for image in &draft.other_images {
        form = form.part("otherImages", image_part(image)?);
    }
    Ok(form)
}

/// File part for an image upload.
pub(super) fn image_part(image: &ImageUpload) -> Result<Part, ApiError> {
    Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)
        .map_err(|e| ApiError::Encode(format!("{}: {e}", image.file_name)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lunchdesk_core::Price;

    use super::*;

    fn draft(images: usize) -> MealDraft {
        MealDraft {
            description: "Grilled salmon with rice".to_string(),
            price: Price::parse("12.50").unwrap(),
            available_day: MealDay::Monday,
            main_image: Some(ImageUpload::from_bytes("main.png", vec![1, 2, 3]).unwrap()),
            other_images: (0..images)
                .map(|i| ImageUpload::from_bytes(format!("extra-{i}.jpg"), vec![0; 4]).unwrap())
                .collect(),
        }
    }

    #[test]
    fn test_meal_form_builds_with_images() {
        let form = meal_form(&draft(3)).unwrap();
        assert!(form.boundary().len() > 10);
    }

    #[test]
    fn test_image_part_rejects_invalid_content_type() {
        let image = ImageUpload {
            file_name: "broken.png".to_string(),
            content_type: "not a mime type".to_string(),
            bytes: vec![],
        };
        assert!(matches!(image_part(&image), Err(ApiError::Encode(_))));
    }
}
