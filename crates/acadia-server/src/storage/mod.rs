//! S3-compatible object storage for uploaded content
//!
//! Content bytes live in S3/MinIO under a business/batch scoped key; the
//! metadata row in `contents` carries the key. Downloads are served through
//! short-lived presigned GET URLs.

use anyhow::{anyhow, Context, Result};
use aws_sdk_s3::{
    config::{Credentials, Region},
    presigning::PresigningConfig,
    primitives::ByteStream,
    Client,
};
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::{debug, info, instrument};
use uuid::Uuid;

pub mod config;

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
}

#[derive(Debug, Clone)]
pub struct UploadResult {
    pub key: String,
    pub checksum: String,
    pub size: i64,
}

impl Storage {
    pub async fn new(config: config::StorageConfig) -> Result<Self> {
        debug!("Initializing storage with config: {:?}", config);

        let credentials = Credentials::new(
            &config.access_key,
            &config.secret_key,
            None,
            None,
            "acadia-storage",
        );

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .credentials_provider(credentials)
            .region(Region::new(config.region.clone()))
            .force_path_style(config.path_style);

        if let Some(endpoint) = &config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(s3_config_builder.build());

        info!("Storage client initialized for bucket: {}", config.bucket);

        Ok(Self {
            client,
            bucket: config.bucket,
        })
    }

    #[instrument(skip(self, data))]
    pub async fn upload(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: Option<String>,
    ) -> Result<UploadResult> {
        let checksum = calculate_sha256(&data);
        let size = data.len() as i64;

        debug!("Uploading {} bytes to s3://{}/{}", size, self.bucket, key);

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(data));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request.send().await.context("Failed to upload to S3")?;

        info!("Successfully uploaded to s3://{}/{}", self.bucket, key);

        Ok(UploadResult {
            key: key.to_string(),
            checksum,
            size,
        })
    }

    #[instrument(skip(self))]
    pub async fn download(&self, key: &str) -> Result<Vec<u8>> {
        debug!("Downloading from s3://{}/{}", self.bucket, key);

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .context(format!("Failed to download from S3: {}", key))?;

        let data = response
            .body
            .collect()
            .await
            .context("Failed to read S3 response body")?
            .into_bytes()
            .to_vec();

        Ok(data)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, key: &str) -> Result<()> {
        debug!("Deleting s3://{}/{}", self.bucket, key);

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .context(format!("Failed to delete from S3: {}", key))?;

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn exists(&self, key: &str) -> Result<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                if e.to_string().contains("NotFound") || e.to_string().contains("404") {
                    Ok(false)
                } else {
                    Err(anyhow!("Failed to check S3 object existence: {}", e))
                }
            },
        }
    }

    #[instrument(skip(self))]
    pub async fn generate_presigned_url(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String> {
        let presigning_config = PresigningConfig::expires_in(expires_in)
            .context("Failed to create presigning config")?;

        let presigned_request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .context("Failed to generate presigned URL")?;

        Ok(presigned_request.uri().to_string())
    }

    /// Object key for an uploaded content file.
    pub fn build_content_key(
        &self,
        business_id: Uuid,
        batch_id: Uuid,
        content_id: Uuid,
        filename: &str,
    ) -> String {
        format!("contents/{}/{}/{}/{}", business_id, batch_id, content_id, filename)
    }
}

/// Hex-encoded SHA-256 of a byte buffer.
pub fn calculate_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_sha256() {
        // Known digest of the empty input
        assert_eq!(
            calculate_sha256(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(calculate_sha256(b"acadia").len(), 64);
    }
}
