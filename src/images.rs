// src/images.rs
//
// Product image storage. When asset host credentials are configured the file
// is pushed to the remote host and its CDN URL is recorded; otherwise it is
// written under the local uploads directory and served from /uploads.
// The upload and the subsequent database write are two independent steps; a
// failed insert after a successful upload leaves the asset behind.
use std::path::Path;

use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::AssetHostConfig;
use crate::error::AppError;

const UPLOAD_FOLDER: &str = "restaurant/products";

pub async fn store_image(
    asset_host: Option<&AssetHostConfig>,
    uploads_dir: &str,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<String, AppError> {
    match asset_host {
        Some(host) => upload_remote(host, filename, bytes).await,
        None => store_local(uploads_dir, filename, bytes).await,
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

async fn upload_remote(
    host: &AssetHostConfig,
    filename: &str,
    bytes: Vec<u8>,
) -> Result<String, AppError> {
    let timestamp = Utc::now().timestamp();
    let signature = sign_request(UPLOAD_FOLDER, timestamp, &host.api_secret);

    let file = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
    let form = reqwest::multipart::Form::new()
        .text("api_key", host.api_key.clone())
        .text("timestamp", timestamp.to_string())
        .text("folder", UPLOAD_FOLDER)
        .text("signature_algorithm", "sha256")
        .text("signature", signature)
        .part("file", file);

    let url = format!(
        "https://api.cloudinary.com/v1_1/{}/image/upload",
        host.cloud_name
    );

    let response = reqwest::Client::new()
        .post(&url)
        .multipart(form)
        .send()
        .await
        .map_err(|e| AppError::internal(format!("Image upload failed: {e}")))?;

    if !response.status().is_success() {
        return Err(AppError::internal(format!(
            "Image host returned {}",
            response.status()
        )));
    }

    let body: UploadResponse = response
        .json()
        .await
        .map_err(|e| AppError::internal(format!("Image host response unreadable: {e}")))?;

    Ok(body.secure_url)
}

async fn store_local(uploads_dir: &str, filename: &str, bytes: Vec<u8>) -> Result<String, AppError> {
    let stored_name = unique_filename(filename);
    let path = Path::new(uploads_dir).join(&stored_name);
    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::internal(format!("Failed to store image: {e}")))?;
    Ok(format!("/uploads/{stored_name}"))
}

// Signature over the alphabetically ordered upload params plus the secret,
// as the asset host's upload API expects.
fn sign_request(folder: &str, timestamp: i64, api_secret: &str) -> String {
    let payload = format!("folder={folder}&timestamp={timestamp}{api_secret}");
    let digest = Sha256::digest(payload.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn unique_filename(original: &str) -> String {
    let ext = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    format!("{}{ext}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matches_known_digest() {
        assert_eq!(
            sign_request("restaurant/products", 1_700_000_000, "topsecret"),
            "8ab012e31b5a01dbeb71b0f6a78d8e5f248f5b522553d495d6f2be78c0f0e965"
        );
    }

    #[test]
    fn local_filenames_keep_the_extension_and_are_unique() {
        let a = unique_filename("menu-photo.png");
        let b = unique_filename("menu-photo.png");
        assert!(a.ends_with(".png"));
        assert!(b.ends_with(".png"));
        assert_ne!(a, b);
    }

    #[test]
    fn extensionless_uploads_get_no_trailing_dot() {
        let name = unique_filename("snapshot");
        assert!(!name.contains('.'));
    }
}
