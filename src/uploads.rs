//! Storage for uploaded candidate photos.
//!
//! Files land in the configured uploads directory under a unique generated
//! name and are referenced everywhere else by their public `/uploads/...`
//! path, which the static file server resolves.

use std::path::Path;

use chrono::Utc;
use rocket::{fs::TempFile, http::ContentType};

use crate::error::{Error, Result};

/// The extension to store a photo under, if its content type is acceptable.
fn photo_extension(content_type: &ContentType) -> Option<&'static str> {
    if *content_type == ContentType::JPEG {
        Some("jpg")
    } else if *content_type == ContentType::PNG {
        Some("png")
    } else {
        None
    }
}

/// A filename that won't collide: millisecond timestamp plus random nonce.
fn unique_name(extension: &str) -> String {
    let stamp = Utc::now().timestamp_millis();
    let nonce: u32 = rand::random();
    format!("{stamp}-{nonce}.{extension}")
}

/// Persist an uploaded candidate photo and return its public path.
///
/// Anything that isn't a JPEG or PNG is rejected as a bad request.
pub async fn store_photo(file: &mut TempFile<'_>, uploads_dir: &Path) -> Result<String> {
    let extension = file
        .content_type()
        .and_then(photo_extension)
        .ok_or_else(|| Error::bad_request("Only JPG, JPEG, PNG allowed"))?;

    let name = unique_name(extension);
    // `copy_to` rather than `persist_to`: the temp dir may be on a different
    // filesystem than the uploads dir.
    file.copy_to(uploads_dir.join(&name)).await?;

    Ok(format!("/uploads/{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_only_images() {
        assert_eq!(photo_extension(&ContentType::JPEG), Some("jpg"));
        assert_eq!(photo_extension(&ContentType::PNG), Some("png"));
        assert_eq!(photo_extension(&ContentType::GIF), None);
        assert_eq!(photo_extension(&ContentType::PDF), None);
        assert_eq!(photo_extension(&ContentType::Plain), None);
    }

    #[test]
    fn generated_names_are_unique_and_keep_extension() {
        let a = unique_name("jpg");
        let b = unique_name("jpg");
        assert_ne!(a, b);
        assert!(a.ends_with(".jpg"));
        assert!(unique_name("png").ends_with(".png"));
    }
}
