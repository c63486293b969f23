//! # Upload Handling
//!
//! Multipart image uploads for expense proofs, transaction payment proofs
//! and the shop logo. Files land under `{upload_dir}/{category}/` with a
//! UUID filename and are served statically at `/uploads`.

use std::path::Path;

use axum::extract::Multipart;
use uuid::Uuid;

use crate::error::ApiError;

/// Expense proof images: 3 MB.
pub const MAX_PROOF_BYTES: usize = 3 * 1024 * 1024;

/// Payment proofs and the shop logo: 5 MB.
pub const MAX_PAYMENT_PROOF_BYTES: usize = 5 * 1024 * 1024;

/// Reads the first file field from a multipart body, verifies it is an
/// image within `max_bytes`, writes it to disk, and returns the public
/// `/uploads/...` path to store on the owning row.
pub async fn save_image(
    multipart: &mut Multipart,
    upload_dir: &Path,
    category: &str,
    max_bytes: usize,
) -> Result<String, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart body: {}", e)))?
    {
        let Some(content_type) = field.content_type().map(str::to_string) else {
            // Skip non-file fields (plain form values)
            continue;
        };

        let ext = extension_for(&content_type)
            .ok_or_else(|| ApiError::validation("Only JPEG, PNG, or WebP images are accepted"))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(format!("Failed to read upload: {}", e)))?;

        if data.is_empty() {
            return Err(ApiError::validation("Uploaded file is empty"));
        }
        if data.len() > max_bytes {
            return Err(ApiError::validation(format!(
                "File exceeds the {} MB limit",
                max_bytes / (1024 * 1024)
            )));
        }

        let dir = upload_dir.join(category);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            tracing::error!("Failed to create upload directory: {}", e);
            ApiError::internal("Failed to store upload")
        })?;

        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        tokio::fs::write(dir.join(&filename), &data)
            .await
            .map_err(|e| {
                tracing::error!("Failed to write upload: {}", e);
                ApiError::internal("Failed to store upload")
            })?;

        return Ok(format!("/uploads/{}/{}", category, filename));
    }

    Err(ApiError::validation("No file field in request"))
}

/// Maps an image content type to its file extension.
fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_images_only() {
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("image/webp"), Some("webp"));
        assert_eq!(extension_for("application/pdf"), None);
        assert_eq!(extension_for("text/html"), None);
    }
}
