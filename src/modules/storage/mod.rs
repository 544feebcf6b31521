//! Storage module for report evidence
//!
//! Hazard media bytes are handed to a [`MediaStorage`] backend which returns an
//! opaque reference recorded as the attachment's `file_path`. The production
//! backend is an S3/MinIO bucket.

mod minio_client;

#[cfg(test)]
mod memory;

pub use minio_client::MinIOClient;

#[cfg(test)]
pub use memory::InMemoryMediaStorage;

use async_trait::async_trait;

use crate::core::error::AppError;

/// Blob storage collaborator for uploaded evidence
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store `data` under `key` and return the reference to persist
    async fn store(&self, key: &str, data: Vec<u8>, content_type: &str)
        -> Result<String, AppError>;

    /// Remove a previously stored object
    async fn delete(&self, reference: &str) -> Result<(), AppError>;
}
