use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use thiserror::Error;

use crate::config::Config;

#[derive(Error, Debug)]
pub enum BlobError {
    #[error("Failed to upload blob {key}: {message}")]
    UploadFailed { key: String, message: String },
}

/// Object storage for photo evidence. One URL per successful upload;
/// failures are surfaced to the caller, which logs and records them.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, key: &str, content_type: &str, bytes: Vec<u8>)
        -> Result<String, BlobError>;
}

pub struct S3BlobStore {
    client: Client,
    bucket: String,
    region: String,
    public_url_base: Option<String>,
}

impl S3BlobStore {
    pub async fn from_config(config: &Config) -> Self {
        let aws_config = aws_config::load_from_env().await;
        Self {
            client: Client::new(&aws_config),
            bucket: config.s3_bucket.clone(),
            region: config.s3_region.clone(),
            public_url_base: config.s3_public_url_base.clone(),
        }
    }

    fn url_for(&self, key: &str) -> String {
        match &self.public_url_base {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn upload(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BlobError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| BlobError::UploadFailed {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        Ok(self.url_for(key))
    }
}

/// In-memory store for tests: records every upload and can be told to fail.
pub struct MemoryBlobStore {
    uploads: Mutex<Vec<(String, usize)>>,
    fail: bool,
}

impl MemoryBlobStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            uploads: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            uploads: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn uploaded_keys(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap_or_else(|e| panic!("Failed to acquire lock on uploads: {}", e))
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        key: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, BlobError> {
        if self.fail {
            return Err(BlobError::UploadFailed {
                key: key.to_string(),
                message: "simulated upload failure".to_string(),
            });
        }
        self.uploads
            .lock()
            .unwrap_or_else(|e| panic!("Failed to acquire lock on uploads: {}", e))
            .push((key.to_string(), bytes.len()));
        Ok(format!("memory://{}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_records_uploads() {
        let store = MemoryBlobStore::new();
        let url = store
            .upload("reports/r1/photo-0.jpg", "image/jpeg", vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(url, "memory://reports/r1/photo-0.jpg");
        assert_eq!(store.uploaded_keys(), vec!["reports/r1/photo-0.jpg"]);
    }

    #[tokio::test]
    async fn test_failing_store_returns_error() {
        let store = MemoryBlobStore::failing();
        let err = store
            .upload("reports/r1/photo-0.jpg", "image/jpeg", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::UploadFailed { .. }));
    }
}
