use printdesk_core::models::{FileKind, OrderFile, UploadStatus};
use printdesk_core::AppError;
use sqlx::PgPool;
use uuid::Uuid;

const FILE_COLUMNS: &str = "id, order_id, kind, file_name, file_size, mime_type, \
     storage_key, storage_url, status, uploaded_by, notes, created_at, updated_at";

/// Repository for order files (customer uploads and staff processed files).
///
/// This repository is the sole writer of `status` and `storage_url`.
#[derive(Clone)]
pub struct OrderFileRepository {
    pool: PgPool,
}

impl OrderFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending file record at reservation time. The storage key is
    /// bound here, exactly once; a collision trips the unique constraint.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_pending(
        &self,
        order_id: Uuid,
        kind: FileKind,
        file_name: &str,
        file_size: i64,
        mime_type: &str,
        storage_key: &str,
        uploaded_by: Uuid,
        notes: Option<&str>,
    ) -> Result<OrderFile, AppError> {
        let file = sqlx::query_as::<_, OrderFile>(&format!(
            r#"
            INSERT INTO order_files (
                order_id, kind, file_name, file_size, mime_type,
                storage_key, storage_url, status, uploaded_by, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, '', 'pending', $7, $8)
            RETURNING {}
            "#,
            FILE_COLUMNS
        ))
        .bind(order_id)
        .bind(kind)
        .bind(file_name)
        .bind(file_size)
        .bind(mime_type)
        .bind(storage_key)
        .bind(uploaded_by)
        .bind(notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(file)
    }

    /// Get a file record by ID
    pub async fn get(&self, file_id: Uuid) -> Result<Option<OrderFile>, AppError> {
        let file = sqlx::query_as::<_, OrderFile>(&format!(
            "SELECT {} FROM order_files WHERE id = $1",
            FILE_COLUMNS
        ))
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(file)
    }

    /// Mark a file completed: storage URL is bound and status becomes
    /// `completed`. Safe to repeat; a record already completed is unchanged.
    pub async fn mark_completed(
        &self,
        file_id: Uuid,
        storage_url: &str,
    ) -> Result<OrderFile, AppError> {
        let file = sqlx::query_as::<_, OrderFile>(&format!(
            r#"
            UPDATE order_files
            SET status = 'completed', storage_url = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            FILE_COLUMNS
        ))
        .bind(file_id)
        .bind(storage_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(file)
    }

    /// Mark a file failed. Guarded so a completed record never regresses,
    /// even if two confirms race.
    pub async fn mark_failed(&self, file_id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE order_files
            SET status = 'failed', updated_at = NOW()
            WHERE id = $1 AND status <> 'completed'
            "#,
        )
        .bind(file_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// List files of one kind for an order, oldest first. `status` filters
    /// when given; customer-facing reads pass `Completed` so orphaned
    /// pending/failed reservations stay invisible.
    pub async fn list_for_order(
        &self,
        order_id: Uuid,
        kind: FileKind,
        status: Option<UploadStatus>,
    ) -> Result<Vec<OrderFile>, AppError> {
        let files = sqlx::query_as::<_, OrderFile>(&format!(
            r#"
            SELECT {} FROM order_files
            WHERE order_id = $1 AND kind = $2
              AND ($3::upload_status IS NULL OR status = $3)
            ORDER BY created_at ASC
            "#,
            FILE_COLUMNS
        ))
        .bind(order_id)
        .bind(kind)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(files)
    }
}
