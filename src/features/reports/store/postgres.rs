use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use super::ReportStore;
use crate::core::error::Result;
use crate::features::reports::models::{
    HazardReport, MediaAttachment, NewHazardReport, NewMediaAttachment, ReportStatus,
    ReportWithMedia, SubmitterProfile,
};

const REPORT_COLUMNS: &str = "report_id, user_id, event_type, report_category, description, \
     latitude, longitude, location_description, source_type, submission_time, \
     report_status, validated_by, validated_time";

const MEDIA_COLUMNS: &str = "media_id, report_id, user_id, media_type, file_path, \
     original_filename, content_type, file_size, created_at";

/// Listing row: the report plus the LEFT JOINed submitter columns
#[derive(FromRow)]
struct ReportListingRow {
    #[sqlx(flatten)]
    report: HazardReport,
    has_submitter: bool,
    submitter_name: Option<String>,
    submitter_photo: Option<String>,
}

/// PostgreSQL-backed implementation of [`ReportStore`]
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_report(
        tx: &mut Transaction<'_, Postgres>,
        report: &NewHazardReport,
    ) -> std::result::Result<HazardReport, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO hazard_reports (
                report_id, user_id, event_type, report_category, description,
                latitude, longitude, location_description, source_type,
                submission_time, report_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {REPORT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, HazardReport>(&sql)
            .bind(Uuid::now_v7())
            .bind(report.user_id)
            .bind(&report.event_type)
            .bind(&report.report_category)
            .bind(&report.description)
            .bind(report.latitude)
            .bind(report.longitude)
            .bind(&report.location_description)
            .bind(&report.source_type)
            .bind(report.submission_time)
            .bind(ReportStatus::Pending)
            .fetch_one(&mut **tx)
            .await
    }

    /// Multi-row INSERT so the whole batch lands in one statement
    async fn insert_media_batch(
        tx: &mut Transaction<'_, Postgres>,
        report: &HazardReport,
        media: &[NewMediaAttachment],
    ) -> std::result::Result<u64, sqlx::Error> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO media_uploads (media_id, report_id, user_id, media_type, file_path, \
             original_filename, content_type, file_size) ",
        );

        builder.push_values(media, |mut row, m| {
            row.push_bind(Uuid::now_v7())
                .push_bind(report.report_id)
                .push_bind(report.user_id)
                .push_bind(m.media_type)
                .push_bind(m.file_path.clone())
                .push_bind(m.original_filename.clone())
                .push_bind(m.content_type.clone())
                .push_bind(m.file_size);
        });

        let result = builder.build().execute(&mut **tx).await?;
        Ok(result.rows_affected())
    }

    async fn media_for_reports(&self, report_ids: &[Uuid]) -> Result<Vec<MediaAttachment>> {
        if report_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {MEDIA_COLUMNS} FROM media_uploads \
             WHERE report_id = ANY($1) ORDER BY created_at, media_id"
        );

        let media = sqlx::query_as::<_, MediaAttachment>(&sql)
            .bind(report_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(media)
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn create_report_with_media(
        &self,
        report: NewHazardReport,
        media: Vec<NewMediaAttachment>,
    ) -> Result<HazardReport> {
        // Dropping the transaction without commit rolls back the report row
        let mut tx = self.pool.begin().await?;

        let created = Self::insert_report(&mut tx, &report).await?;

        if !media.is_empty() {
            let inserted = Self::insert_media_batch(&mut tx, &created, &media).await?;
            debug!(
                "Inserted {} media rows for report {}",
                inserted, created.report_id
            );
        }

        tx.commit().await?;

        info!(
            "Hazard report created: id={}, user_id={}, media={}",
            created.report_id,
            created.user_id,
            media.len()
        );

        Ok(created)
    }

    async fn list_reports(&self) -> Result<Vec<ReportWithMedia>> {
        let sql = r#"
            SELECT
                r.report_id, r.user_id, r.event_type, r.report_category, r.description,
                r.latitude, r.longitude, r.location_description, r.source_type,
                r.submission_time, r.report_status, r.validated_by, r.validated_time,
                (u.user_id IS NOT NULL) AS has_submitter,
                u.name AS submitter_name,
                u.profile_photo AS submitter_photo
            FROM hazard_reports r
            LEFT JOIN users u ON u.user_id = r.user_id
            ORDER BY r.submission_time DESC, r.report_id DESC
        "#;

        let rows = sqlx::query_as::<_, ReportListingRow>(sql)
            .fetch_all(&self.pool)
            .await?;

        let report_ids: Vec<Uuid> = rows.iter().map(|r| r.report.report_id).collect();
        let mut media_by_report: HashMap<Uuid, Vec<MediaAttachment>> = HashMap::new();
        for attachment in self.media_for_reports(&report_ids).await? {
            media_by_report
                .entry(attachment.report_id)
                .or_default()
                .push(attachment);
        }

        Ok(rows
            .into_iter()
            .map(|row| ReportWithMedia {
                media: media_by_report
                    .remove(&row.report.report_id)
                    .unwrap_or_default(),
                submitter: row.has_submitter.then_some(SubmitterProfile {
                    name: row.submitter_name,
                    profile_photo: row.submitter_photo,
                }),
                report: row.report,
            })
            .collect())
    }

    async fn find_report(&self, report_id: Uuid) -> Result<Option<HazardReport>> {
        let sql = format!("SELECT {REPORT_COLUMNS} FROM hazard_reports WHERE report_id = $1");

        let report = sqlx::query_as::<_, HazardReport>(&sql)
            .bind(report_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(report)
    }

    async fn mark_validated(
        &self,
        report_id: Uuid,
        validated_by: i64,
        validated_time: DateTime<Utc>,
        only_if_pending: bool,
    ) -> Result<Option<HazardReport>> {
        let guard = if only_if_pending {
            " AND report_status = 'Pending'"
        } else {
            ""
        };
        let sql = format!(
            r#"
            UPDATE hazard_reports
            SET report_status = $2, validated_by = $3, validated_time = $4
            WHERE report_id = $1{guard}
            RETURNING {REPORT_COLUMNS}
            "#
        );

        let report = sqlx::query_as::<_, HazardReport>(&sql)
            .bind(report_id)
            .bind(ReportStatus::Validated)
            .bind(validated_by)
            .bind(validated_time)
            .fetch_optional(&self.pool)
            .await?;

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::MediaType;

    fn new_report(user_id: i64) -> NewHazardReport {
        NewHazardReport {
            user_id,
            event_type: "Fire".to_string(),
            report_category: "Hazard".to_string(),
            description: "Warehouse fire".to_string(),
            latitude: 19.07,
            longitude: 72.87,
            location_description: "Dock 4".to_string(),
            source_type: "Citizen".to_string(),
            submission_time: Utc::now(),
        }
    }

    fn image(path: &str) -> NewMediaAttachment {
        NewMediaAttachment {
            media_type: MediaType::Image,
            file_path: path.to_string(),
            original_filename: "dock.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            file_size: 2 * 1024 * 1024,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_create_and_list_with_submitter(pool: PgPool) {
        sqlx::query("INSERT INTO users (user_id, name, profile_photo) VALUES (42, 'Asha', NULL)")
            .execute(&pool)
            .await
            .unwrap();
        let store = PgReportStore::new(pool);

        let created = store
            .create_report_with_media(new_report(42), vec![image("a.jpg"), image("b.jpg")])
            .await
            .unwrap();
        assert_eq!(created.report_status, ReportStatus::Pending);
        assert!(created.validated_by.is_none());

        let listed = store.list_reports().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].media.len(), 2);
        assert!(listed[0]
            .media
            .iter()
            .all(|m| m.report_id == created.report_id && m.user_id == 42));
        assert_eq!(
            listed[0].submitter.as_ref().and_then(|s| s.name.as_deref()),
            Some("Asha")
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_failed_media_batch_rolls_back_report(pool: PgPool) {
        let store = PgReportStore::new(pool);
        // Negative file_size violates the CHECK constraint on the second row
        let mut bad = image("b.jpg");
        bad.file_size = -1;

        let result = store
            .create_report_with_media(new_report(42), vec![image("a.jpg"), bad])
            .await;

        assert!(result.is_err());
        assert!(store.list_reports().await.unwrap().is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires a PostgreSQL DATABASE_URL"]
    async fn test_guarded_validation_leaves_validated_rows_alone(pool: PgPool) {
        let store = PgReportStore::new(pool);
        let created = store
            .create_report_with_media(new_report(42), Vec::new())
            .await
            .unwrap();

        let first = store
            .mark_validated(created.report_id, 7, Utc::now(), true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.validated_by, Some(7));

        let second = store
            .mark_validated(created.report_id, 8, Utc::now(), true)
            .await
            .unwrap();
        assert!(second.is_none());

        let missing = store
            .mark_validated(Uuid::now_v7(), 7, Utc::now(), false)
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
