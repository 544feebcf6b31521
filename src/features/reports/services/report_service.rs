use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{CreateHazardReportDto, ReportFilterQuery};
use crate::features::reports::models::{
    HazardReport, NewHazardReport, NewMediaAttachment, ReportWithMedia, RevalidationPolicy,
};
use crate::features::reports::services::AcceptedMedia;
use crate::features::reports::store::ReportStore;
use crate::modules::storage::MediaStorage;
use crate::shared::constants::MEDIA_PURPOSE;

/// File extension for an accepted content type
fn extension_for(content_type: &str, original_filename: &str) -> String {
    let known = match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "video/mp4" => Some("mp4"),
        "video/quicktime" => Some("mov"),
        "video/webm" => Some("webm"),
        "video/3gpp" => Some("3gp"),
        _ => None,
    };

    known
        .map(str::to_string)
        .or_else(|| {
            original_filename
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
                .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        })
        .unwrap_or_else(|| "bin".to_string())
}

/// Service for hazard report submission, listing and validation
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    media_storage: Arc<dyn MediaStorage>,
    revalidation_policy: RevalidationPolicy,
}

impl ReportService {
    pub fn new(
        store: Arc<dyn ReportStore>,
        media_storage: Arc<dyn MediaStorage>,
        revalidation_policy: RevalidationPolicy,
    ) -> Self {
        Self {
            store,
            media_storage,
            revalidation_policy,
        }
    }

    /// Persist a new `Pending` report and its evidence for the caller.
    ///
    /// The submitter is always the authenticated caller. Blobs are stored
    /// first; if the database write fails they are removed again.
    pub async fn submit(
        &self,
        user: &AuthenticatedUser,
        payload: CreateHazardReportDto,
        media: Vec<AcceptedMedia>,
    ) -> Result<HazardReport> {
        let stored = self.store_media(user.user_id, media).await?;
        let references: Vec<String> = stored.iter().map(|m| m.file_path.clone()).collect();

        let report = NewHazardReport {
            user_id: user.user_id,
            event_type: payload.event_type,
            report_category: payload.report_category,
            description: payload.description,
            latitude: payload.latitude,
            longitude: payload.longitude,
            location_description: payload.location_description,
            source_type: payload.source_type,
            submission_time: Utc::now(),
        };

        match self.store.create_report_with_media(report, stored).await {
            Ok(created) => {
                info!(
                    "Report {} submitted by user {} with {} attachment(s)",
                    created.report_id,
                    created.user_id,
                    references.len()
                );
                Ok(created)
            }
            Err(e) => {
                self.discard_media(&references).await;
                Err(e)
            }
        }
    }

    /// Hand each attachment to media storage, undoing earlier uploads if one fails
    async fn store_media(
        &self,
        user_id: i64,
        media: Vec<AcceptedMedia>,
    ) -> Result<Vec<NewMediaAttachment>> {
        let mut stored: Vec<NewMediaAttachment> = Vec::with_capacity(media.len());

        for item in media {
            let key = format!(
                "{}/{}/{}.{}",
                MEDIA_PURPOSE,
                user_id,
                Uuid::now_v7(),
                extension_for(&item.content_type, &item.original_filename)
            );
            let file_size = item.data.len() as i64;

            match self
                .media_storage
                .store(&key, item.data, &item.content_type)
                .await
            {
                Ok(file_path) => {
                    debug!("Stored {:?} evidence at {}", item.media_type, file_path);
                    stored.push(NewMediaAttachment {
                        media_type: item.media_type,
                        file_path,
                        original_filename: item.original_filename,
                        content_type: item.content_type,
                        file_size,
                    });
                }
                Err(e) => {
                    let references: Vec<String> =
                        stored.iter().map(|m| m.file_path.clone()).collect();
                    self.discard_media(&references).await;
                    return Err(e);
                }
            }
        }

        Ok(stored)
    }

    async fn discard_media(&self, references: &[String]) {
        for reference in references {
            if let Err(e) = self.media_storage.delete(reference).await {
                warn!("Failed to remove orphaned evidence {}: {}", reference, e);
            }
        }
    }

    /// All reports, newest first. `_filter` is reserved and not applied.
    pub async fn list(&self, _filter: &ReportFilterQuery) -> Result<Vec<ReportWithMedia>> {
        self.store.list_reports().await
    }

    /// Move a report to `Validated`, stamped with the caller and the current time
    pub async fn validate(
        &self,
        user: &AuthenticatedUser,
        report_id: Uuid,
    ) -> Result<HazardReport> {
        let updated = self
            .store
            .mark_validated(
                report_id,
                user.user_id,
                Utc::now(),
                self.revalidation_policy.requires_pending(),
            )
            .await?;

        if let Some(report) = updated {
            info!(
                "Report {} validated by user {}",
                report.report_id, user.user_id
            );
            return Ok(report);
        }

        // Nothing updated: either the id is unknown or the guard held
        let existing = self
            .store
            .find_report(report_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", report_id)))?;

        match self.revalidation_policy {
            RevalidationPolicy::Reject => Err(AppError::Conflict(format!(
                "Report {} is already {}",
                report_id, existing.report_status
            ))),
            RevalidationPolicy::Keep | RevalidationPolicy::Overwrite => {
                debug!(
                    "Report {} already validated, keeping existing stamp",
                    report_id
                );
                Ok(existing)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{MediaType, ReportStatus};
    use crate::features::reports::store::InMemoryReportStore;
    use crate::modules::storage::InMemoryMediaStorage;
    use crate::shared::test_helpers::create_test_user;

    struct Fixture {
        store: Arc<InMemoryReportStore>,
        storage: Arc<InMemoryMediaStorage>,
        service: ReportService,
    }

    fn fixture(policy: RevalidationPolicy) -> Fixture {
        let store = Arc::new(InMemoryReportStore::new());
        let storage = Arc::new(InMemoryMediaStorage::new());
        let service = ReportService::new(store.clone(), storage.clone(), policy);
        Fixture {
            store,
            storage,
            service,
        }
    }

    fn payload() -> CreateHazardReportDto {
        CreateHazardReportDto {
            event_type: "Fire".to_string(),
            report_category: "Hazard".to_string(),
            description: "Warehouse fire".to_string(),
            latitude: 19.07,
            longitude: 72.87,
            location_description: "Dock 4".to_string(),
            source_type: "Citizen".to_string(),
        }
    }

    fn jpeg(size: usize) -> AcceptedMedia {
        AcceptedMedia {
            original_filename: "dock4.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            media_type: MediaType::Image,
            data: vec![0u8; size],
        }
    }

    #[test]
    fn test_extension_for_known_and_unknown_types() {
        assert_eq!(extension_for("image/jpeg", "x.jpeg"), "jpg");
        assert_eq!(extension_for("video/quicktime", "clip.MOV"), "mov");
        assert_eq!(extension_for("image/x-raw", "shot.DNG"), "dng");
        assert_eq!(extension_for("image/x-raw", "noext"), "bin");
        assert_eq!(extension_for("image/x-raw", "../../etc/passwd.$$"), "bin");
    }

    #[tokio::test]
    async fn test_submit_creates_pending_report_for_caller() {
        let f = fixture(RevalidationPolicy::default());
        let caller = create_test_user(42);

        let report = f
            .service
            .submit(&caller, payload(), vec![jpeg(2 * 1024 * 1024)])
            .await
            .unwrap();

        assert_eq!(report.user_id, 42);
        assert_eq!(report.report_status, ReportStatus::Pending);
        assert!(report.validated_by.is_none());
        assert!(report.validated_time.is_none());

        let media = f.store.media_for(report.report_id);
        assert_eq!(media.len(), 1);
        assert_eq!(media[0].media_type, MediaType::Image);
        assert_eq!(media[0].user_id, 42);
        assert_eq!(media[0].file_size, 2 * 1024 * 1024);
        assert!(media[0].file_path.starts_with("hazard-reports/42/"));
        assert!(f.storage.contains(&media[0].file_path));
    }

    #[tokio::test]
    async fn test_each_attachment_gets_a_record() {
        for n in 0..=5 {
            let f = fixture(RevalidationPolicy::default());
            let media = (0..n).map(|_| jpeg(16)).collect();
            let report = f
                .service
                .submit(&create_test_user(42), payload(), media)
                .await
                .unwrap();

            let stored = f.store.media_for(report.report_id);
            assert_eq!(stored.len(), n);
            assert!(stored.iter().all(|m| m.report_id == report.report_id));
        }
    }

    #[tokio::test]
    async fn test_failed_media_batch_leaves_no_report_or_blobs() {
        let f = fixture(RevalidationPolicy::default());
        f.store.fail_media_batch();

        let result = f
            .service
            .submit(&create_test_user(42), payload(), vec![jpeg(16), jpeg(16)])
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
        assert_eq!(f.store.report_count(), 0);
        assert_eq!(f.store.media_count(), 0);
        assert_eq!(f.storage.object_count(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_creates_nothing() {
        let f = fixture(RevalidationPolicy::default());
        f.storage.fail_stores();

        let result = f
            .service
            .submit(&create_test_user(42), payload(), vec![jpeg(16)])
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert_eq!(f.store.report_count(), 0);
    }

    #[tokio::test]
    async fn test_validate_stamps_reviewer_and_time() {
        let f = fixture(RevalidationPolicy::default());
        let report = f
            .service
            .submit(&create_test_user(42), payload(), Vec::new())
            .await
            .unwrap();

        let before = Utc::now();
        let validated = f
            .service
            .validate(&create_test_user(7), report.report_id)
            .await
            .unwrap();

        assert_eq!(validated.report_status, ReportStatus::Validated);
        assert_eq!(validated.validated_by, Some(7));
        assert!(validated.validated_time.unwrap() >= before);
    }

    #[tokio::test]
    async fn test_validate_unknown_report_is_not_found() {
        let f = fixture(RevalidationPolicy::default());
        f.service
            .submit(&create_test_user(42), payload(), Vec::new())
            .await
            .unwrap();

        let err = f
            .service
            .validate(&create_test_user(7), Uuid::now_v7())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        let listed = f.store.list_reports().await.unwrap();
        assert_eq!(listed[0].report.report_status, ReportStatus::Pending);
        assert!(listed[0].report.validated_by.is_none());
    }

    #[tokio::test]
    async fn test_revalidation_policies() {
        let cases = [
            (RevalidationPolicy::Overwrite, Some(8)),
            (RevalidationPolicy::Keep, Some(7)),
            (RevalidationPolicy::Reject, None),
        ];

        for (policy, expected_validator) in cases {
            let f = fixture(policy);
            let report = f
                .service
                .submit(&create_test_user(42), payload(), Vec::new())
                .await
                .unwrap();
            f.service
                .validate(&create_test_user(7), report.report_id)
                .await
                .unwrap();

            let second = f
                .service
                .validate(&create_test_user(8), report.report_id)
                .await;

            match expected_validator {
                Some(id) => assert_eq!(second.unwrap().validated_by, Some(id)),
                None => assert!(matches!(second, Err(AppError::Conflict(_)))),
            }

            let stored = f.store.find_report(report.report_id).await.unwrap().unwrap();
            assert_eq!(stored.report_status, ReportStatus::Validated);
        }
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let f = fixture(RevalidationPolicy::default());
        assert!(f
            .service
            .list(&ReportFilterQuery::default())
            .await
            .unwrap()
            .is_empty());

        let mut ids = Vec::new();
        for _ in 0..3 {
            let report = f
                .service
                .submit(&create_test_user(42), payload(), Vec::new())
                .await
                .unwrap();
            ids.push(report.report_id);
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let listed = f.service.list(&ReportFilterQuery::default()).await.unwrap();
        let listed_ids: Vec<Uuid> = listed.iter().map(|r| r.report.report_id).collect();
        ids.reverse();
        assert_eq!(listed_ids, ids);
    }
}
