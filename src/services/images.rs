//! Image uploads to object storage.
//!
//! Uploaded objects never overwrite: each gets a fresh
//! `uploads/{millis}-{random}.{ext}` path.

#[cfg(test)]
#[path = "images_test.rs"]
mod images_test;

use backend::{Backend, StoredObject, UploadOptions};

use crate::config::PLACEHOLDER_IMAGE;
use crate::error::ServiceError;
use crate::state::toast::Notice;

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
const UPLOAD_PREFIX: &str = "uploads";
const LIST_LIMIT: usize = 100;

/// Where an uploaded image ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
    pub path: String,
}

/// Reject non-images and files over the size cap before uploading.
///
/// # Errors
///
/// The toast to show instead of uploading.
pub fn check_image(content_type: &str, size: usize) -> Result<(), Notice> {
    if !content_type.starts_with("image/") {
        return Err(Notice::error("Invalid file type", "Please upload an image file."));
    }
    if size > MAX_IMAGE_BYTES {
        return Err(Notice::error("File too large", "Please upload an image smaller than 10MB."));
    }
    Ok(())
}

/// Storage path for a new upload of `file_name` at `now_ms`.
pub fn upload_path(file_name: &str, now_ms: i64) -> String {
    let token = uuid::Uuid::new_v4().simple().to_string();
    let token = &token[..11];
    match file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()) {
        Some(ext) if !ext.is_empty() => format!("{UPLOAD_PREFIX}/{now_ms}-{token}.{ext}"),
        _ => format!("{UPLOAD_PREFIX}/{now_ms}-{token}"),
    }
}

/// Upload `bytes` and return the public URL and stored path.
///
/// # Errors
///
/// Returns the storage error (for example, a rejected or oversized object).
pub async fn upload_image(
    backend: &Backend,
    file_name: &str,
    bytes: Vec<u8>,
    content_type: &str,
    bucket: &str,
) -> Result<UploadedImage, ServiceError> {
    let path = upload_path(file_name, backend.now_ms());
    let storage = backend.storage();
    let stored = storage.upload(bucket, &path, bytes, content_type, &UploadOptions::default()).await?;
    log::info!("images: uploaded {stored} to {bucket}");
    Ok(UploadedImage { url: storage.public_url(bucket, &stored), path: stored })
}

/// # Errors
///
/// Returns the storage error.
pub async fn delete_image(backend: &Backend, path: &str, bucket: &str) -> Result<(), ServiceError> {
    backend.storage().remove(bucket, &[path.to_owned()]).await?;
    Ok(())
}

/// Objects under `prefix`, first page only.
///
/// # Errors
///
/// Returns the storage error.
pub async fn list_images(backend: &Backend, prefix: &str, bucket: &str) -> Result<Vec<StoredObject>, ServiceError> {
    Ok(backend.storage().list(bucket, prefix, LIST_LIMIT, 0).await?)
}

/// Display URL for a stored image reference: the placeholder when unset,
/// absolute URLs unchanged, bucket paths through the public URL.
pub fn resolve_image_url(backend: &Backend, path: Option<&str>) -> String {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        None => PLACEHOLDER_IMAGE.to_owned(),
        Some(p) if p.starts_with("http") => p.to_owned(),
        Some(p) => backend.storage().public_url(&backend.config().image_bucket, p),
    }
}
