//! Meal create/edit form and image uploads.

use super::{ValidationError, non_blank};
use crate::models::Meal;
use crate::types::{MealDay, Price};

/// Maximum number of additional (gallery) images per meal.
pub const MAX_OTHER_IMAGES: usize = 5;

/// An image file selected for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Wrap file contents, inferring the content type from the extension.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnsupportedImage`] if the extension is not a known
    /// image type.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, ValidationError> {
        let file_name = file_name.into();
        let content_type = Self::content_type_for(&file_name)
            .ok_or_else(|| ValidationError::UnsupportedImage(file_name.clone()))?;
        Ok(Self {
            file_name,
            content_type: content_type.to_owned(),
            bytes,
        })
    }

    /// Content type for an image file name, by extension.
    #[must_use]
    pub fn content_type_for(file_name: &str) -> Option<&'static str> {
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            "svg" => Some("image/svg+xml"),
            _ => None,
        }
    }
}

/// The add/edit meal modal.
#[derive(Debug, Clone)]
pub struct MealForm {
    pub description: String,
    pub price: String,
    pub available_day: MealDay,
    pub main_image: Option<ImageUpload>,
    other_images: Vec<ImageUpload>,
    /// Gallery images already stored on the server for the meal being edited.
    existing_other_images: usize,
}

/// Validated multipart payload for `POST /admin/meals` and
/// `PUT /admin/meals/:id`.
#[derive(Debug, Clone)]
pub struct MealDraft {
    pub description: String,
    pub price: Price,
    pub available_day: MealDay,
    pub main_image: Option<ImageUpload>,
    pub other_images: Vec<ImageUpload>,
}

impl MealForm {
    /// Empty form for adding a meal on `day`.
    #[must_use]
    pub const fn new(day: MealDay) -> Self {
        Self {
            description: String::new(),
            price: String::new(),
            available_day: day,
            main_image: None,
            other_images: Vec::new(),
            existing_other_images: 0,
        }
    }

    /// Form prefilled from an existing meal.
    #[must_use]
    pub fn for_meal(meal: &Meal) -> Self {
        Self {
            description: meal.description.clone(),
            price: meal.price.to_string(),
            available_day: meal.available_day,
            main_image: None,
            other_images: Vec::new(),
            existing_other_images: meal.other_images.len(),
        }
    }

    /// Gallery images selected so far.
    #[must_use]
    pub fn other_images(&self) -> &[ImageUpload] {
        &self.other_images
    }

    /// Remaining gallery slots, counting images already on the server.
    #[must_use]
    pub fn remaining_image_slots(&self) -> usize {
        MAX_OTHER_IMAGES.saturating_sub(self.existing_other_images + self.other_images.len())
    }

    /// Add a gallery image.
    ///
    /// # Errors
    ///
    /// [`ValidationError::TooManyImages`] if all slots are taken; the form is
    /// left unchanged.
    pub fn add_other_image(&mut self, image: ImageUpload) -> Result<(), ValidationError> {
        if self.remaining_image_slots() == 0 {
            return Err(ValidationError::TooManyImages {
                max: MAX_OTHER_IMAGES,
            });
        }
        self.other_images.push(image);
        Ok(())
    }

    /// Remove a newly selected gallery image. Out-of-range indexes are ignored.
    pub fn remove_other_image(&mut self, index: usize) -> Option<ImageUpload> {
        (index < self.other_images.len()).then(|| self.other_images.remove(index))
    }

    /// Validate description and price.
    ///
    /// # Errors
    ///
    /// [`ValidationError::Required`] for an empty field or
    /// [`ValidationError::Price`] for an invalid amount.
    pub fn validate(&self) -> Result<MealDraft, ValidationError> {
        let description =
            non_blank(&self.description).ok_or(ValidationError::Required("Description"))?;
        if self.price.trim().is_empty() {
            return Err(ValidationError::Required("Price"));
        }
        let price = Price::parse(&self.price)?;
        Ok(MealDraft {
            description,
            price,
            available_day: self.available_day,
            main_image: self.main_image.clone(),
            other_images: self.other_images.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::MealId;

    fn image(name: &str) -> ImageUpload {
        ImageUpload::from_bytes(name, vec![0xFF, 0xD8]).unwrap()
    }

    #[test]
    fn test_content_type_from_extension() {
        assert_eq!(ImageUpload::content_type_for("a.JPG"), Some("image/jpeg"));
        assert_eq!(ImageUpload::content_type_for("a.webp"), Some("image/webp"));
        assert_eq!(ImageUpload::content_type_for("a.txt"), None);
        assert_eq!(ImageUpload::content_type_for("noext"), None);
        assert!(matches!(
            ImageUpload::from_bytes("menu.pdf", vec![]),
            Err(ValidationError::UnsupportedImage(_))
        ));
    }

    #[test]
    fn test_gallery_is_capped_at_five() {
        let mut form = MealForm::new(MealDay::Monday);
        for i in 0..MAX_OTHER_IMAGES {
            form.add_other_image(image(&format!("{i}.png"))).unwrap();
        }
        assert_eq!(form.remaining_image_slots(), 0);
        assert_eq!(
            form.add_other_image(image("6.png")).unwrap_err(),
            ValidationError::TooManyImages { max: 5 }
        );
        assert_eq!(form.other_images().len(), MAX_OTHER_IMAGES);

        assert!(form.remove_other_image(0).is_some());
        assert!(form.remove_other_image(42).is_none());
        assert_eq!(form.remaining_image_slots(), 1);
    }

    #[test]
    fn test_existing_images_count_towards_cap() {
        let meal = Meal {
            id: MealId::new("m1"),
            description: "Soup".to_string(),
            price: Price::parse("4.50").unwrap(),
            available_day: MealDay::Tuesday,
            main_image: None,
            other_images: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            created_at: None,
        };
        let mut form = MealForm::for_meal(&meal);
        assert_eq!(form.price, "4.5");
        form.add_other_image(image("e.png")).unwrap();
        assert!(form.add_other_image(image("f.png")).is_err());
    }

    #[test]
    fn test_validate_requires_description_and_price() {
        let mut form = MealForm::new(MealDay::Friday);
        form.price = "10".to_string();
        assert_eq!(
            form.validate().unwrap_err(),
            ValidationError::Required("Description")
        );

        form.description = "Fish and chips".to_string();
        form.price = "ten".to_string();
        assert!(matches!(form.validate(), Err(ValidationError::Price(_))));

        form.price = "10.00".to_string();
        let draft = form.validate().unwrap();
        assert_eq!(draft.available_day, MealDay::Friday);
        assert_eq!(draft.price.to_string(), "10");
    }
}
