//! MinIO/S3-compatible evidence storage
//!
//! Uses rust-s3 crate for lightweight S3 operations.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use super::MediaStorage;
use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

/// MinIO/S3-compatible storage client
pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    key_prefix: String,
}

impl MinIOClient {
    /// Create a new MinIO client from configuration
    pub fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // Path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}",
            config.endpoint,
            bucket.name()
        );

        Ok(Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            key_prefix: config.key_prefix,
        })
    }

    /// Ensure the bucket exists, create if not
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        let result = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(_) => {
                info!("Bucket '{}' created successfully", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
                Ok(())
            }
        }
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Full object key for a storage path (e.g. "uploads/hazard-reports/42/x.jpg")
    fn object_key(&self, path: &str) -> String {
        format!("{}/{}", self.key_prefix, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl MediaStorage for MinIOClient {
    async fn store(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, AppError> {
        let object_key = self.object_key(key);
        let response = self
            .bucket
            .put_object_with_content_type(&object_key, &data, content_type)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to upload '{}': {}", object_key, e)))?;

        if !(200..300).contains(&response.status_code()) {
            return Err(AppError::Storage(format!(
                "Upload of '{}' returned HTTP {}",
                object_key,
                response.status_code()
            )));
        }

        debug!(
            "Uploaded '{}' ({} bytes) to bucket '{}'",
            object_key,
            data.len(),
            self.bucket.name()
        );
        Ok(object_key)
    }

    async fn delete(&self, reference: &str) -> Result<(), AppError> {
        self.bucket
            .delete_object(reference)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete '{}': {}", reference, e)))?;

        debug!(
            "Deleted '{}' from bucket '{}'",
            reference,
            self.bucket.name()
        );
        Ok(())
    }
}
