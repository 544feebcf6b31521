use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::{MediaIntakeFilter, ReportService};

/// Create routes for the reports feature
///
/// All routes require authentication (auth middleware applied by caller).
/// `body_limit` caps the whole multipart submission.
pub fn routes(
    report_service: Arc<ReportService>,
    intake: Arc<MediaIntakeFilter>,
    body_limit: usize,
) -> Router {
    let state = ReportState {
        report_service,
        intake,
    };

    Router::new()
        .route(
            "/api/v1/reports",
            get(handlers::list_reports)
                .post(handlers::submit_report)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/api/v1/reports/{id}/validate",
            patch(handlers::validate_report),
        )
        .with_state(state)
}
