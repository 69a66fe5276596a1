use crate::error::UserError;

/// Image content types accepted for announcement posts.
pub const IMAGE_CONTENT_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Reject anything that is not one of [`IMAGE_CONTENT_TYPES`]. Parameters such
/// as `; charset=...` are ignored.
pub fn ensure_image_content_type(content_type: Option<&str>) -> Result<(), UserError> {
    let essence = content_type
        .and_then(|raw| raw.split(';').next())
        .map(|raw| raw.trim().to_ascii_lowercase());

    match essence {
        Some(essence) if IMAGE_CONTENT_TYPES.contains(&essence.as_str()) => Ok(()),
        _ => Err(UserError::bad_argument("Attached file was not an image.")),
    }
}

#[cfg(test)]
mod tests {
    use super::ensure_image_content_type;

    #[test]
    fn accepts_allowed_images() {
        for content_type in ["image/png", "image/jpeg", "image/gif", "image/webp", "IMAGE/PNG"] {
            assert!(ensure_image_content_type(Some(content_type)).is_ok(), "{content_type}");
        }
    }

    #[test]
    fn rejects_other_types() {
        assert!(ensure_image_content_type(Some("application/pdf")).is_err());
        assert!(ensure_image_content_type(Some("image/svg+xml")).is_err());
        assert!(ensure_image_content_type(Some("video/mp4")).is_err());
        assert!(ensure_image_content_type(None).is_err());
    }
}
