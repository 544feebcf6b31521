use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::{
    HazardReport, MediaAttachment, MediaType, ReportStatus, ReportWithMedia, SubmitterProfile,
};

/// Submission form for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct SubmitReportFormDto {
    #[schema(example = "Fire")]
    pub event_type: String,
    #[schema(example = "Hazard")]
    pub report_category: String,
    #[schema(example = "Warehouse fire")]
    pub description: String,
    #[schema(example = 19.07)]
    pub latitude: f64,
    #[schema(example = 72.87)]
    pub longitude: f64,
    #[schema(example = "Dock 4")]
    pub location_description: String,
    #[schema(example = "Citizen")]
    pub source_type: String,
    /// Image or video file; repeat the field for up to 5 files of 20 MB each
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub media: String,
}

/// Validated report payload assembled from the multipart text fields
#[derive(Debug, Clone, Validate)]
pub struct CreateHazardReportDto {
    #[validate(length(min = 1, max = 100, message = "eventType is required"))]
    pub event_type: String,

    #[validate(length(min = 1, max = 100, message = "reportCategory is required"))]
    pub report_category: String,

    #[validate(length(min = 1, max = 5000, message = "description is required"))]
    pub description: String,

    pub latitude: f64,

    pub longitude: f64,

    #[validate(length(min = 1, max = 500, message = "locationDescription is required"))]
    pub location_description: String,

    #[validate(length(min = 1, max = 100, message = "sourceType is required"))]
    pub source_type: String,
}

impl CreateHazardReportDto {
    /// Field rules plus coordinate bounds, joined into one message
    pub fn check(&self) -> Result<(), String> {
        let mut errors = Vec::new();

        if let Err(e) = self.validate() {
            errors.push(e.to_string());
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            errors.push("latitude must be between -90 and 90".to_string());
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            errors.push("longitude must be between -180 and 180".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.join(", "))
        }
    }
}

/// Query parameters for listing reports.
///
/// Accepted for forward compatibility; no filter is applied yet.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
pub struct ReportFilterQuery {
    pub event_type: Option<String>,
    pub report_category: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HazardReportResponseDto {
    pub report_id: Uuid,
    pub user_id: i64,
    pub event_type: String,
    pub report_category: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_description: String,
    pub source_type: String,
    pub submission_time: DateTime<Utc>,
    pub status: ReportStatus,
    pub validated_by: Option<i64>,
    pub validated_time: Option<DateTime<Utc>>,
}

impl From<HazardReport> for HazardReportResponseDto {
    fn from(r: HazardReport) -> Self {
        Self {
            report_id: r.report_id,
            user_id: r.user_id,
            event_type: r.event_type,
            report_category: r.report_category,
            description: r.description,
            latitude: r.latitude,
            longitude: r.longitude,
            location_description: r.location_description,
            source_type: r.source_type,
            submission_time: r.submission_time,
            status: r.report_status,
            validated_by: r.validated_by,
            validated_time: r.validated_time,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaAttachmentResponseDto {
    pub media_id: Uuid,
    pub report_id: Uuid,
    pub user_id: i64,
    pub media_type: MediaType,
    pub file_path: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<MediaAttachment> for MediaAttachmentResponseDto {
    fn from(m: MediaAttachment) -> Self {
        Self {
            media_id: m.media_id,
            report_id: m.report_id,
            user_id: m.user_id,
            media_type: m.media_type,
            file_path: m.file_path,
            original_filename: m.original_filename,
            content_type: m.content_type,
            file_size: m.file_size,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitterDto {
    pub name: Option<String>,
    pub profile_photo: Option<String>,
}

impl From<SubmitterProfile> for SubmitterDto {
    fn from(s: SubmitterProfile) -> Self {
        Self {
            name: s.name,
            profile_photo: s.profile_photo,
        }
    }
}

/// Listed report with its evidence and submitter display info
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportListItemDto {
    #[serde(flatten)]
    pub report: HazardReportResponseDto,
    pub media: Vec<MediaAttachmentResponseDto>,
    pub submitter: Option<SubmitterDto>,
}

impl From<ReportWithMedia> for ReportListItemDto {
    fn from(r: ReportWithMedia) -> Self {
        Self {
            report: r.report.into(),
            media: r.media.into_iter().map(Into::into).collect(),
            submitter: r.submitter.map(Into::into),
        }
    }
}
