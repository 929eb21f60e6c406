use std::path::Path;

use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};

use crate::core::errors::ApiError;

/// Listing row for the record picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecordSummary {
    pub id: i64,
    pub original_filename: String,
    pub subject: String,
}

/// One stored incident email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRecord {
    pub id: i64,
    pub original_filename: String,
    pub subject: String,
    pub body_text: String,
}

/// Read-mostly view over the externally-owned `eml_reports` database.
///
/// The table is bootstrapped when absent so a missing database reads as an
/// empty listing instead of an error.
#[derive(Clone)]
pub struct EmailRecordStore {
    pool: SqlitePool,
}

impl EmailRecordStore {
    pub async fn new(db_path: &Path) -> Result<Self, ApiError> {
        let conn_str = format!("sqlite://{}?mode=rwc", db_path.to_string_lossy());
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&conn_str)
            .await
            .map_err(|e| ApiError::internal(format!("Failed to connect to eml db: {}", e)))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS eml_reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                original_filename TEXT NOT NULL,
                subject TEXT,
                body_text TEXT,
                upload_time TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to init eml_reports table: {}", e)))?;

        Ok(Self { pool })
    }

    /// Records with usable body text, most recent first.
    pub async fn list(&self) -> Result<Vec<EmailRecordSummary>, ApiError> {
        let rows = sqlx::query(
            "SELECT id, original_filename, subject
             FROM eml_reports
             WHERE body_text IS NOT NULL AND body_text != ''
             ORDER BY upload_time DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(EmailRecordSummary {
                id: row.try_get::<i64, _>("id").unwrap_or_default(),
                original_filename: row
                    .try_get::<String, _>("original_filename")
                    .unwrap_or_default(),
                subject: row
                    .try_get::<Option<String>, _>("subject")
                    .unwrap_or(None)
                    .unwrap_or_default(),
            });
        }

        Ok(records)
    }

    pub async fn get(&self, id: i64) -> Result<Option<EmailRecord>, ApiError> {
        let row = sqlx::query(
            "SELECT id, original_filename, subject, body_text
             FROM eml_reports WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(row.map(|row| EmailRecord {
            id: row.try_get::<i64, _>("id").unwrap_or_default(),
            original_filename: row
                .try_get::<String, _>("original_filename")
                .unwrap_or_default(),
            subject: row
                .try_get::<Option<String>, _>("subject")
                .unwrap_or(None)
                .unwrap_or_default(),
            body_text: row
                .try_get::<Option<String>, _>("body_text")
                .unwrap_or(None)
                .unwrap_or_default(),
        }))
    }

    /// Seed entry point for external loaders and tests.
    pub async fn insert(
        &self,
        original_filename: &str,
        subject: &str,
        body_text: &str,
    ) -> Result<i64, ApiError> {
        let result = sqlx::query(
            "INSERT INTO eml_reports (original_filename, subject, body_text)
             VALUES (?, ?, ?)",
        )
        .bind(original_filename)
        .bind(subject)
        .bind(body_text)
        .execute(&self.pool)
        .await
        .map_err(ApiError::internal)?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_in(dir: &tempfile::TempDir) -> EmailRecordStore {
        EmailRecordStore::new(&dir.path().join("eml_reports.db"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn empty_database_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn listing_skips_bodiless_records_and_orders_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;

        store
            .insert("first.eml", "첫 장애보고", "복구보고 본문 1")
            .await
            .unwrap();
        store.insert("empty.eml", "본문 없음", "").await.unwrap();
        let second = store
            .insert("second.eml", "둘째 장애보고", "복구보고 본문 2")
            .await
            .unwrap();

        // same-second timestamps tie; force distinct upload times
        sqlx::query("UPDATE eml_reports SET upload_time = datetime('now', '+1 hour') WHERE id = ?")
            .bind(second)
            .execute(&store.pool)
            .await
            .unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].original_filename, "second.eml");
        assert_eq!(records[1].original_filename, "first.eml");
    }

    #[tokio::test]
    async fn get_returns_full_body() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir).await;
        let id = store
            .insert("report.eml", "장애보고", "ㅇ 대상서비스 : KOS-오더")
            .await
            .unwrap();

        let record = store.get(id).await.unwrap().unwrap();
        assert_eq!(record.subject, "장애보고");
        assert!(record.body_text.contains("KOS-오더"));
    }
}
