//! Local storage of uploaded image files
//!
//! Uploaded files are written under the configured upload directory with a
//! UUID file name; only the file name is persisted, and URLs are rebuilt
//! from the configured public origin when rows are returned.

use axum::extract::multipart::Field;
use std::path::Path;
use tracing::{error, warn};
use uuid::Uuid;

use crate::error::ApiError;

/// Persist a multipart file field. Returns the stored file name, relative
/// to the upload directory.
pub async fn store_upload(dir: &Path, field: Field<'_>) -> Result<String, ApiError> {
    let extension = extension_from(field.file_name(), field.content_type());

    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart payload: {}", e)))?;
    if data.is_empty() {
        return Err(ApiError::BadRequest("image file is empty".to_string()));
    }

    let file_name = match extension {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    };

    let path = dir.join(&file_name);
    tokio::fs::write(&path, &data).await.map_err(|e| {
        error!("Failed to write upload {}: {}", path.display(), e);
        ApiError::InternalServerError
    })?;

    Ok(file_name)
}

/// Remove a stored upload. Failure is logged, not fatal: the row deletion
/// already happened and a leftover file is harmless.
pub async fn remove_upload(dir: &Path, file_name: &str) {
    let path = dir.join(file_name);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!("Failed to remove upload {}: {}", path.display(), e);
    }
}

/// Rewrite a stored relative file name to an absolute URL under the public
/// origin; already-absolute URLs pass through unchanged.
pub fn absolute_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/uploads/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Sanitized file extension from the client file name, falling back to the
/// declared content type
fn extension_from(file_name: Option<&str>, content_type: Option<&str>) -> Option<String> {
    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(char::is_alphanumeric));

    from_name.or_else(|| match content_type {
        Some("image/png") => Some("png".to_string()),
        Some("image/jpeg") => Some("jpg".to_string()),
        Some("image/gif") => Some("gif".to_string()),
        Some("image/webp") => Some("webp".to_string()),
        Some("image/svg+xml") => Some("svg".to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_url_joins_base_and_path() {
        assert_eq!(
            absolute_url("http://localhost:4000", "abc.png"),
            "http://localhost:4000/uploads/abc.png"
        );
        assert_eq!(
            absolute_url("http://localhost:4000/", "/abc.png"),
            "http://localhost:4000/uploads/abc.png"
        );
        assert_eq!(
            absolute_url("http://localhost:4000", "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn extension_prefers_file_name() {
        assert_eq!(
            extension_from(Some("photo.PNG"), Some("image/jpeg")),
            Some("png".to_string())
        );
        assert_eq!(
            extension_from(Some("photo"), Some("image/jpeg")),
            Some("jpg".to_string())
        );
        assert_eq!(extension_from(None, Some("application/pdf")), None);
        // Suspicious extensions are dropped rather than stored.
        assert_eq!(
            extension_from(Some("a.this-is-not-an-ext"), None),
            None
        );
    }
}
