use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kind of evidence, derived from the declared content type at intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "media_type")]
pub enum MediaType {
    Image,
    Video,
}

/// Database model for a media upload attached to a report
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MediaAttachment {
    pub media_id: Uuid,
    pub report_id: Uuid,
    /// Copied from the owning report's submitter
    pub user_id: i64,
    pub media_type: MediaType,
    /// Opaque reference returned by media storage
    pub file_path: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

/// Data for attaching stored evidence to the report being created.
///
/// Carries no report or user id: the store copies both from the report it
/// creates in the same write.
#[derive(Debug, Clone)]
pub struct NewMediaAttachment {
    pub media_type: MediaType,
    pub file_path: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
}
