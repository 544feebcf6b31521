//! Persistence boundary for hazard reports and their media.
//!
//! Handlers and services only see [`ReportStore`]; the PostgreSQL backend is
//! wired in `main`, tests substitute the in-memory fake.

mod postgres;

#[cfg(test)]
mod memory;

pub use postgres::PgReportStore;

#[cfg(test)]
pub use memory::InMemoryReportStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::reports::models::{
    HazardReport, NewHazardReport, NewMediaAttachment, ReportWithMedia,
};

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Create a `Pending` report and its media batch as one unit.
    ///
    /// Either the report and every attachment become visible, or nothing does.
    async fn create_report_with_media(
        &self,
        report: NewHazardReport,
        media: Vec<NewMediaAttachment>,
    ) -> Result<HazardReport>;

    /// All reports with attachments and submitter info, newest submission first
    async fn list_reports(&self) -> Result<Vec<ReportWithMedia>>;

    async fn find_report(&self, report_id: Uuid) -> Result<Option<HazardReport>>;

    /// Set `Validated` with the reviewer stamp in a single update.
    ///
    /// With `only_if_pending`, rows already validated are left untouched.
    /// Returns `None` when no row was updated.
    async fn mark_validated(
        &self,
        report_id: Uuid,
        validated_by: i64,
        validated_time: DateTime<Utc>,
        only_if_pending: bool,
    ) -> Result<Option<HazardReport>>;
}
