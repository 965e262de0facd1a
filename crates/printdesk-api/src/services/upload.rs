//! Upload session service
//!
//! Owns the three-phase handshake: reserve → client-direct-upload →
//! confirm, and the per-file upload state machine. Reservation creates the
//! pending record only after the signed URL is issued, so a storage fault
//! leaves no orphan row; after the record exists, a store-miss at confirm
//! is captured as a FAILED transition rather than thrown away.

use printdesk_core::models::{
    ConfirmUploadResponse, FileKind, Order, OrderFile, Principal, ReserveUploadRequest,
    ReserveUploadResponse, UploadStatus,
};
use printdesk_core::{policy, AppError};
use printdesk_db::{OrderFileRepository, OrderRepository};
use printdesk_storage::{derive_key, ObjectStorage};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

/// What a confirm call should do, given the record's current status and the
/// result of the existence probe. Pure: the full state machine in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmOutcome {
    /// Object present: converge on COMPLETED (idempotent for repeats,
    /// recovery for FAILED records whose key was re-uploaded).
    Complete,
    /// Object absent on a non-terminal record: transition to FAILED.
    Fail,
    /// Object absent but the record already COMPLETED: report the miss
    /// without regressing the terminal state.
    Reject,
}

fn decide_confirm(status: UploadStatus, exists: bool) -> ConfirmOutcome {
    match (exists, status) {
        (true, _) => ConfirmOutcome::Complete,
        (false, UploadStatus::Completed) => ConfirmOutcome::Reject,
        (false, _) => ConfirmOutcome::Fail,
    }
}

#[derive(Clone)]
pub struct UploadSessionService {
    orders: OrderRepository,
    files: OrderFileRepository,
    storage: Arc<dyn ObjectStorage>,
    upload_url_ttl: Duration,
}

impl UploadSessionService {
    pub fn new(
        orders: OrderRepository,
        files: OrderFileRepository,
        storage: Arc<dyn ObjectStorage>,
        upload_url_ttl: Duration,
    ) -> Self {
        Self {
            orders,
            files,
            storage,
            upload_url_ttl,
        }
    }

    /// Reserve an upload slot: authorize, derive a storage key, issue a
    /// signed PUT URL, and create the PENDING file record.
    pub async fn reserve(
        &self,
        order_id: Uuid,
        principal: Principal,
        request: ReserveUploadRequest,
    ) -> Result<ReserveUploadResponse, AppError> {
        request.validate()?;

        let order = self.load_order(order_id).await?;

        if !policy::can_reserve_file(&principal, &order, request.kind) {
            return Err(AppError::Forbidden(format!(
                "Principal {} may not reserve {:?} uploads for order {}",
                principal.id, request.kind, order.id
            )));
        }

        if request.kind == FileKind::Customer && !order.status.accepts_uploads() {
            return Err(AppError::Forbidden(format!(
                "Order {} no longer accepts uploads",
                order.id
            )));
        }

        let storage_key = derive_key(principal.id, &request.file_name, request.kind);
        let upload_url = self
            .storage
            .issue_upload_url(&storage_key, self.upload_url_ttl)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to issue upload URL: {}", e)))?;

        // Notes are a staff annotation on processed files only.
        let notes = match request.kind {
            FileKind::Processed => request.notes.as_deref(),
            FileKind::Customer => None,
        };

        let file = self
            .files
            .create_pending(
                order.id,
                request.kind,
                &request.file_name,
                request.file_size,
                &request.mime_type,
                &storage_key,
                principal.id,
                notes,
            )
            .await?;

        tracing::info!(
            order_id = %order.id,
            file_id = %file.id,
            kind = ?file.kind,
            storage_key = %storage_key,
            "Upload slot reserved"
        );

        Ok(ReserveUploadResponse {
            file_id: file.id,
            upload_url,
            storage_key,
        })
    }

    /// Confirm an upload: verify the object landed in storage and settle
    /// the record's state. Every call resolves to either a terminal state
    /// transition or an explicit error.
    pub async fn confirm(
        &self,
        order_id: Uuid,
        file_id: Uuid,
        principal: Principal,
        declared_kind: Option<FileKind>,
    ) -> Result<ConfirmUploadResponse, AppError> {
        let order = self.load_order(order_id).await?;

        let file = self
            .files
            .get(file_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File not found: {}", file_id)))?;

        if file.order_id != order.id {
            return Err(AppError::OwnershipMismatch(
                "File does not belong to this order".to_string(),
            ));
        }

        if let Some(kind) = declared_kind {
            if kind != file.kind {
                return Err(AppError::InvalidInput(format!(
                    "Declared kind {:?} does not match the file's kind {:?}",
                    kind, file.kind
                )));
            }
        }

        if !policy::can_confirm_file(&principal, &order, file.kind) {
            return Err(AppError::Forbidden(format!(
                "Principal {} may not confirm {:?} uploads for order {}",
                principal.id, file.kind, order.id
            )));
        }

        let exists = self
            .storage
            .exists(&file.storage_key)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to check file existence: {}", e)))?;

        match decide_confirm(file.status, exists) {
            ConfirmOutcome::Complete => {
                // storage_url is the storage key: downloads always go
                // through freshly signed URLs, never a stored one.
                let updated = self.files.mark_completed(file.id, &file.storage_key).await?;
                tracing::info!(
                    order_id = %order.id,
                    file_id = %updated.id,
                    storage_key = %updated.storage_key,
                    "Upload confirmed"
                );
                Ok(confirm_response(updated))
            }
            ConfirmOutcome::Fail => {
                self.files.mark_failed(file.id).await?;
                tracing::warn!(
                    order_id = %order.id,
                    file_id = %file.id,
                    storage_key = %file.storage_key,
                    "Upload confirmation failed: object absent from storage"
                );
                Err(AppError::InvalidInput(
                    "File not found in storage".to_string(),
                ))
            }
            ConfirmOutcome::Reject => Err(AppError::InvalidInput(
                "File not found in storage".to_string(),
            )),
        }
    }

    async fn load_order(&self, order_id: Uuid) -> Result<Order, AppError> {
        self.orders
            .get(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order not found: {}", order_id)))
    }
}

fn confirm_response(file: OrderFile) -> ConfirmUploadResponse {
    ConfirmUploadResponse {
        id: file.id,
        file_name: file.file_name,
        status: file.status,
        kind: file.kind,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_object_always_completes() {
        assert_eq!(
            decide_confirm(UploadStatus::Pending, true),
            ConfirmOutcome::Complete
        );
        // Re-confirming a completed record is safe and re-verifies.
        assert_eq!(
            decide_confirm(UploadStatus::Completed, true),
            ConfirmOutcome::Complete
        );
        // A failed record recovers when the client retried the PUT to the
        // same key.
        assert_eq!(
            decide_confirm(UploadStatus::Failed, true),
            ConfirmOutcome::Complete
        );
    }

    #[test]
    fn test_absent_object_fails_non_terminal_records() {
        assert_eq!(
            decide_confirm(UploadStatus::Pending, false),
            ConfirmOutcome::Fail
        );
        assert_eq!(
            decide_confirm(UploadStatus::Failed, false),
            ConfirmOutcome::Fail
        );
    }

    #[test]
    fn test_absent_object_never_regresses_completed() {
        assert_eq!(
            decide_confirm(UploadStatus::Completed, false),
            ConfirmOutcome::Reject
        );
    }
}
