use std::sync::Arc;

use axum::{
    extract::{multipart::Field, Multipart, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppPath;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    CreateHazardReportDto, HazardReportResponseDto, ReportFilterQuery, ReportListItemDto,
    SubmitReportFormDto,
};
use crate::features::reports::services::{
    AcceptedMedia, IncomingMedia, MediaIntakeFilter, ReportService,
};
use crate::shared::constants::{FALLBACK_CONTENT_TYPE, MEDIA_FIELD};
use crate::shared::types::{ApiResponse, Meta};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub report_service: Arc<ReportService>,
    pub intake: Arc<MediaIntakeFilter>,
}

/// Text fields collected from the submission form
#[derive(Default)]
struct ReportForm {
    event_type: Option<String>,
    report_category: Option<String>,
    description: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    location_description: Option<String>,
    source_type: Option<String>,
}

impl ReportForm {
    /// Store a text field; returns false for names the form does not know
    fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "eventType" | "event_type" => &mut self.event_type,
            "reportCategory" | "report_category" => &mut self.report_category,
            "description" => &mut self.description,
            "latitude" => &mut self.latitude,
            "longitude" => &mut self.longitude,
            "locationDescription" | "location_description" => &mut self.location_description,
            "sourceType" | "source_type" => &mut self.source_type,
            _ => return false,
        };
        *slot = Some(value.trim().to_string());
        true
    }

    fn into_dto(self) -> Result<CreateHazardReportDto> {
        let dto = CreateHazardReportDto {
            event_type: required(self.event_type, "eventType")?,
            report_category: required(self.report_category, "reportCategory")?,
            description: required(self.description, "description")?,
            latitude: coordinate(self.latitude, "latitude")?,
            longitude: coordinate(self.longitude, "longitude")?,
            location_description: required(self.location_description, "locationDescription")?,
            source_type: required(self.source_type, "sourceType")?,
        };

        dto.check().map_err(AppError::Validation)?;
        Ok(dto)
    }
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    value.ok_or_else(|| AppError::Validation(format!("{} is required", name)))
}

fn coordinate(value: Option<String>, name: &str) -> Result<f64> {
    let raw = required(value, name)?;
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::Validation(format!("{} must be a number, got '{}'", name, raw)))
}

/// Drain one `media` part, enforcing the size ceiling chunk by chunk
async fn read_media(intake: &MediaIntakeFilter, mut field: Field<'_>) -> Result<AcceptedMedia> {
    let content_type = field
        .content_type()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string();
    intake.check_content_type(&content_type)?;

    let original_filename = field.file_name().unwrap_or("unnamed").to_string();

    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| {
        debug!("Failed to read media chunk: {}", e);
        AppError::BadRequest(format!("Failed to read media data: {}", e))
    })? {
        intake.check_size(data.len() + chunk.len())?;
        data.extend_from_slice(&chunk);
    }

    intake.accept(IncomingMedia {
        original_filename,
        content_type,
        data,
    })
}

/// Submit a hazard report
///
/// Accepts multipart/form-data with the report fields and up to five `media`
/// parts. The submitter is always the authenticated caller.
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body(
        content = SubmitReportFormDto,
        content_type = "multipart/form-data",
        description = "Report fields plus repeated `media` files (image or video)",
    ),
    responses(
        (status = 201, description = "Report submitted", body = ApiResponse<HazardReportResponseDto>),
        (status = 400, description = "Invalid payload or rejected media"),
        (status = 401, description = "Authentication required"),
        (status = 500, description = "Report could not be stored"),
        (status = 502, description = "Media storage unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn submit_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<HazardReportResponseDto>>)> {
    let mut form = ReportForm::default();
    let mut media: Vec<AcceptedMedia> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == MEDIA_FIELD {
            state.intake.check_count(media.len())?;
            media.push(read_media(&state.intake, field).await?);
            continue;
        }

        let value = field.text().await.map_err(|e| {
            AppError::BadRequest(format!("Failed to read field '{}': {}", field_name, e))
        })?;

        match field_name.as_str() {
            "userId" | "user_id" => {
                debug!(
                    "Ignoring client-supplied {}={}, submitter is user {}",
                    field_name, value, user.user_id
                );
            }
            name => {
                if !form.set(name, value) {
                    debug!("Ignoring unknown field: {}", name);
                }
            }
        }
    }

    let payload = form.into_dto()?;
    let report = state.report_service.submit(&user, payload, media).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report submitted".to_string()),
            None,
        )),
    ))
}

/// List all hazard reports, newest first
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    params(ReportFilterQuery),
    responses(
        (status = 200, description = "Reports with attachments and submitter", body = ApiResponse<Vec<ReportListItemDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_reports(
    _user: AuthenticatedUser,
    State(state): State<ReportState>,
    Query(filter): Query<ReportFilterQuery>,
) -> Result<Json<ApiResponse<Vec<ReportListItemDto>>>> {
    let reports = state.report_service.list(&filter).await?;
    let total = reports.len() as i64;
    let dtos: Vec<ReportListItemDto> = reports.into_iter().map(Into::into).collect();
    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

/// Mark a report as validated by the caller
#[utoipa::path(
    patch,
    path = "/api/v1/reports/{id}/validate",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report validated", body = ApiResponse<HazardReportResponseDto>),
        (status = 400, description = "Malformed report ID"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Report not found"),
        (status = 409, description = "Report already validated")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn validate_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<HazardReportResponseDto>>> {
    let report = state.report_service.validate(&user, id).await?;
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Report validated".to_string()),
        None,
    )))
}
