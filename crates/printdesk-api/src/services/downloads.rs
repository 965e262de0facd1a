//! Download link issuer
//!
//! Batch-issues short-lived signed GET URLs for the completed files of one
//! order. Authorization happens once in the handler; URL issuance for the
//! individual files runs concurrently with no ordering guarantee among the
//! calls, while the result preserves listing order (creation time
//! ascending). A single failed issuance fails the whole batch.

use futures::future::try_join_all;
use printdesk_core::models::{DownloadLink, FileKind, OrderFile, UploadStatus};
use printdesk_core::AppError;
use printdesk_db::OrderFileRepository;
use printdesk_storage::ObjectStorage;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Clone)]
pub struct DownloadLinkService {
    files: OrderFileRepository,
    storage: Arc<dyn ObjectStorage>,
    download_url_ttl: Duration,
}

impl DownloadLinkService {
    pub fn new(
        files: OrderFileRepository,
        storage: Arc<dyn ObjectStorage>,
        download_url_ttl: Duration,
    ) -> Self {
        Self {
            files,
            storage,
            download_url_ttl,
        }
    }

    /// Issue signed GET URLs for every completed file of `kind` on the
    /// order. An order with no matching files yields an empty list.
    pub async fn issue_batch(
        &self,
        order_id: Uuid,
        kind: FileKind,
    ) -> Result<Vec<DownloadLink>, AppError> {
        let files = self
            .files
            .list_for_order(order_id, kind, Some(UploadStatus::Completed))
            .await?;

        let links = issue_links(self.storage.as_ref(), &files, self.download_url_ttl)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to issue download URLs: {}", e)))?;

        tracing::debug!(
            order_id = %order_id,
            kind = ?kind,
            count = links.len(),
            "Issued download link batch"
        );

        Ok(links)
    }
}

/// Sign one GET URL per file, concurrently. `try_join_all` preserves input
/// order and fails the whole batch on the first error.
async fn issue_links(
    storage: &dyn ObjectStorage,
    files: &[OrderFile],
    ttl: Duration,
) -> Result<Vec<DownloadLink>, printdesk_storage::StorageError> {
    try_join_all(files.iter().map(|file| async move {
        let url = storage.issue_download_url(&file.storage_key, ttl).await?;
        Ok(DownloadLink {
            file_id: file.id,
            file_name: file.file_name.clone(),
            url,
        })
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use printdesk_storage::{StorageError, StorageResult};

    /// Mock store: signs URLs by echoing the key, fails on keys flagged bad.
    struct MockStorage;

    #[async_trait]
    impl ObjectStorage for MockStorage {
        async fn issue_upload_url(
            &self,
            key: &str,
            _expires_in: Duration,
        ) -> StorageResult<String> {
            Ok(format!("https://store.test/put/{}", key))
        }

        async fn issue_download_url(
            &self,
            key: &str,
            _expires_in: Duration,
        ) -> StorageResult<String> {
            if key.contains("poison") {
                return Err(StorageError::SignFailed("poisoned key".to_string()));
            }
            Ok(format!("https://store.test/get/{}", key))
        }

        async fn exists(&self, _key: &str) -> StorageResult<bool> {
            Ok(true)
        }
    }

    fn file_with_key(key: &str) -> OrderFile {
        let now = Utc::now();
        OrderFile {
            id: Uuid::new_v4(),
            order_id: Uuid::new_v4(),
            kind: FileKind::Customer,
            file_name: "model.stl".to_string(),
            file_size: 10000,
            mime_type: "model/stl".to_string(),
            storage_key: key.to_string(),
            storage_url: key.to_string(),
            status: UploadStatus::Completed,
            uploaded_by: Uuid::new_v4(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_success() {
        let links = issue_links(&MockStorage, &[], Duration::from_secs(60))
            .await
            .unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_links_preserve_listing_order() {
        let files = vec![
            file_with_key("uploads/u/1-a.stl"),
            file_with_key("uploads/u/2-b.stl"),
            file_with_key("uploads/u/3-c.stl"),
        ];
        let links = issue_links(&MockStorage, &files, Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(links.len(), 3);
        for (link, file) in links.iter().zip(&files) {
            assert_eq!(link.file_id, file.id);
            assert!(link.url.ends_with(&file.storage_key));
        }
    }

    #[tokio::test]
    async fn test_single_failure_fails_the_whole_batch() {
        let files = vec![
            file_with_key("uploads/u/1-a.stl"),
            file_with_key("uploads/u/2-poison.stl"),
            file_with_key("uploads/u/3-c.stl"),
        ];
        let result = issue_links(&MockStorage, &files, Duration::from_secs(60)).await;
        assert!(result.is_err());
    }
}
