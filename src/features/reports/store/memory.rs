use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ReportStore;
use crate::core::error::{AppError, Result};
use crate::features::reports::models::{
    HazardReport, MediaAttachment, NewHazardReport, NewMediaAttachment, ReportStatus,
    ReportWithMedia, SubmitterProfile,
};

#[derive(Default)]
struct Tables {
    reports: Vec<HazardReport>,
    media: Vec<MediaAttachment>,
    users: HashMap<i64, SubmitterProfile>,
}

/// In-memory [`ReportStore`] for tests.
///
/// Submissions are staged and applied under one lock, so a failure injected
/// between the report write and the media write leaves no trace.
#[derive(Default)]
pub struct InMemoryReportStore {
    tables: Mutex<Tables>,
    fail_media_batch: AtomicBool,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the media write of every later submission fail
    pub fn fail_media_batch(&self) {
        self.fail_media_batch.store(true, Ordering::SeqCst);
    }

    pub fn add_user(&self, user_id: i64, name: &str, profile_photo: Option<&str>) {
        self.tables.lock().unwrap().users.insert(
            user_id,
            SubmitterProfile {
                name: Some(name.to_string()),
                profile_photo: profile_photo.map(str::to_string),
            },
        );
    }

    pub fn report_count(&self) -> usize {
        self.tables.lock().unwrap().reports.len()
    }

    pub fn media_for(&self, report_id: Uuid) -> Vec<MediaAttachment> {
        self.tables
            .lock()
            .unwrap()
            .media
            .iter()
            .filter(|m| m.report_id == report_id)
            .cloned()
            .collect()
    }

    pub fn media_count(&self) -> usize {
        self.tables.lock().unwrap().media.len()
    }
}

#[async_trait]
impl ReportStore for InMemoryReportStore {
    async fn create_report_with_media(
        &self,
        report: NewHazardReport,
        media: Vec<NewMediaAttachment>,
    ) -> Result<HazardReport> {
        let created = HazardReport {
            report_id: Uuid::now_v7(),
            user_id: report.user_id,
            event_type: report.event_type,
            report_category: report.report_category,
            description: report.description,
            latitude: report.latitude,
            longitude: report.longitude,
            location_description: report.location_description,
            source_type: report.source_type,
            submission_time: report.submission_time,
            report_status: ReportStatus::Pending,
            validated_by: None,
            validated_time: None,
        };

        if !media.is_empty() && self.fail_media_batch.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::Protocol(
                "injected media batch failure".to_string(),
            )));
        }

        let staged_media: Vec<MediaAttachment> = media
            .into_iter()
            .map(|m| MediaAttachment {
                media_id: Uuid::now_v7(),
                report_id: created.report_id,
                user_id: created.user_id,
                media_type: m.media_type,
                file_path: m.file_path,
                original_filename: m.original_filename,
                content_type: m.content_type,
                file_size: m.file_size,
                created_at: Utc::now(),
            })
            .collect();

        let mut tables = self.tables.lock().unwrap();
        tables.reports.push(created.clone());
        tables.media.extend(staged_media);

        Ok(created)
    }

    async fn list_reports(&self) -> Result<Vec<ReportWithMedia>> {
        let tables = self.tables.lock().unwrap();

        let mut reports = tables.reports.clone();
        reports.sort_by(|a, b| {
            b.submission_time
                .cmp(&a.submission_time)
                .then_with(|| b.report_id.cmp(&a.report_id))
        });

        Ok(reports
            .into_iter()
            .map(|report| ReportWithMedia {
                media: tables
                    .media
                    .iter()
                    .filter(|m| m.report_id == report.report_id)
                    .cloned()
                    .collect(),
                submitter: tables.users.get(&report.user_id).cloned(),
                report,
            })
            .collect())
    }

    async fn find_report(&self, report_id: Uuid) -> Result<Option<HazardReport>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .reports
            .iter()
            .find(|r| r.report_id == report_id)
            .cloned())
    }

    async fn mark_validated(
        &self,
        report_id: Uuid,
        validated_by: i64,
        validated_time: DateTime<Utc>,
        only_if_pending: bool,
    ) -> Result<Option<HazardReport>> {
        let mut tables = self.tables.lock().unwrap();
        let Some(report) = tables.reports.iter_mut().find(|r| {
            r.report_id == report_id
                && (!only_if_pending || r.report_status == ReportStatus::Pending)
        }) else {
            return Ok(None);
        };

        report.report_status = ReportStatus::Validated;
        report.validated_by = Some(validated_by);
        report.validated_time = Some(validated_time);
        Ok(Some(report.clone()))
    }
}
