//! Stead Storage
//!
//! Upload gateway over an S3-compatible object store. One atomic PUT per
//! call: no retry, no multipart. Keys are collision-resistant but keep the
//! original filename readable: `uploads/<hash8>-<filename>`. The public
//! URL is minted from the configured CDN base, never from the bucket
//! endpoint.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;

use stead_config::StorageConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("{0}")]
    Upload(String),

    #[error("storage configuration missing: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Key prefix for all uploaded objects.
pub const UPLOAD_PREFIX: &str = "uploads/";

/// Derive the storage key for a filename at a given high-resolution
/// instant: `uploads/<sha256(filename + nanos)[0..8] hex>-<filename>`.
pub fn key_for(filename: &str, nanos: u128) -> String {
    let mut hasher = Sha256::new();
    hasher.update(filename.as_bytes());
    hasher.update(nanos.to_string().as_bytes());
    let hash8 = &hex::encode(hasher.finalize())[..8];
    format!("{UPLOAD_PREFIX}{hash8}-{filename}")
}

/// Key for "now".
pub fn storage_key(filename: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    key_for(filename, nanos)
}

/// Seam the upload state machine mocks in tests.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload a buffer, return the public URL.
    async fn upload(&self, buffer: &[u8], filename: &str, content_type: &str) -> Result<String>;
}

pub struct ObjectStorage {
    http: reqwest::Client,
    endpoint: String,
    bucket: String,
    cdn_base: String,
    token: Option<String>,
}

impl ObjectStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket,
            cdn_base: config.cdn_base.trim_end_matches('/').to_string(),
            token: config.token,
        }
    }

    pub fn from_env() -> Result<Self> {
        let config = StorageConfig::from_env().map_err(|e| StorageError::Config(e.to_string()))?;
        Ok(Self::new(config))
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.endpoint, self.bucket, key)
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.cdn_base, key)
    }
}

#[async_trait]
impl Uploader for ObjectStorage {
    async fn upload(&self, buffer: &[u8], filename: &str, content_type: &str) -> Result<String> {
        let key = storage_key(filename);

        let mut request = self
            .http
            .put(self.object_url(&key))
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(buffer.to_vec());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;
        if !response.status().is_success() {
            return Err(StorageError::Upload(format!(
                "object put failed: {}",
                response.status()
            )));
        }

        let url = self.public_url(&key);
        tracing::info!(key, size = buffer.len(), "uploaded object");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_valid_key(key: &str, filename: &str) -> bool {
        let Some(rest) = key.strip_prefix(UPLOAD_PREFIX) else {
            return false;
        };
        let Some((hash8, name)) = rest.split_once('-') else {
            return false;
        };
        hash8.len() == 8
            && hash8.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
            && name == filename
    }

    #[test]
    fn test_key_matches_expected_pattern() {
        let key = key_for("photo.jpg", 1_000_000);
        assert!(is_valid_key(&key, "photo.jpg"), "bad key: {key}");
    }

    #[test]
    fn test_same_name_different_instants_differ() {
        let first = key_for("photo.jpg", 1);
        let second = key_for("photo.jpg", 2);
        assert_ne!(first, second);
        assert!(is_valid_key(&first, "photo.jpg"));
        assert!(is_valid_key(&second, "photo.jpg"));
    }

    #[test]
    fn test_storage_key_uses_wall_clock() {
        let key = storage_key("avatar.png");
        assert!(is_valid_key(&key, "avatar.png"));
    }

    #[test]
    fn test_public_url_comes_from_cdn_base() {
        let storage = ObjectStorage::new(StorageConfig {
            endpoint: "https://s3.example.com/".into(),
            region: None,
            bucket: "stead-media".into(),
            cdn_base: "https://cdn.example.com/".into(),
            token: None,
        });
        assert_eq!(
            storage.public_url("uploads/deadbeef-a.jpg"),
            "https://cdn.example.com/uploads/deadbeef-a.jpg"
        );
        assert_eq!(
            storage.object_url("uploads/deadbeef-a.jpg"),
            "https://s3.example.com/stead-media/uploads/deadbeef-a.jpg"
        );
    }
}
