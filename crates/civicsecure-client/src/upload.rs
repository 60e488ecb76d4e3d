//! Metadata checks for user-selected images (profile photo, identity card
//! scans). Only metadata is inspected; file contents are never read.

use civicsecure_shared::constants::MAX_IMAGE_SIZE;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, size: u64) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            size,
        }
    }

    /// Accept `image/*` files up to 5 MiB.
    pub fn check(&self) -> Result<(), &'static str> {
        if !self.content_type.starts_with("image/") {
            return Err("Please select a valid image file (JPG, PNG, GIF)");
        }
        if self.size > MAX_IMAGE_SIZE {
            return Err("File size must be less than 5MB");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_images_up_to_limit() {
        assert!(ImageUpload::new("me.png", "image/png", MAX_IMAGE_SIZE).check().is_ok());
    }

    #[test]
    fn rejects_other_types_and_large_files() {
        assert_eq!(
            ImageUpload::new("cv.pdf", "application/pdf", 10).check(),
            Err("Please select a valid image file (JPG, PNG, GIF)")
        );
        assert_eq!(
            ImageUpload::new("big.jpg", "image/jpeg", MAX_IMAGE_SIZE + 1).check(),
            Err("File size must be less than 5MB")
        );
    }
}
