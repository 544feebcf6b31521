use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Report status enum matching database enum
///
/// `Pending` is the initial state; `Validated` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "report_status")]
pub enum ReportStatus {
    Pending,
    Validated,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "Pending"),
            ReportStatus::Validated => write!(f, "Validated"),
        }
    }
}

/// Database model for a hazard report
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct HazardReport {
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
    pub report_status: ReportStatus,
    pub validated_by: Option<i64>,
    pub validated_time: Option<DateTime<Utc>>,
}

/// Data for creating a new report. The submitter is always the caller.
#[derive(Debug, Clone)]
pub struct NewHazardReport {
    pub user_id: i64,
    pub event_type: String,
    pub report_category: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_description: String,
    pub source_type: String,
    pub submission_time: DateTime<Utc>,
}

/// Display info of the submitting user, owned by the identity provider
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct SubmitterProfile {
    pub name: Option<String>,
    pub profile_photo: Option<String>,
}

/// A report joined with its evidence and submitter, as listed to reviewers
#[derive(Debug, Clone)]
pub struct ReportWithMedia {
    pub report: HazardReport,
    pub media: Vec<super::MediaAttachment>,
    pub submitter: Option<SubmitterProfile>,
}
