use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// File kind: customer design uploads vs. staff processed results.
/// Both kinds go through the same reserve/confirm handshake and the same
/// upload state machine; they differ only in ownership and visibility rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "file_kind", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Customer,
    Processed,
}

/// Upload state of a file record.
///
/// `Pending` from reservation until the client confirms; `Completed` once
/// the object is verified present in storage; `Failed` when confirmation
/// found the object absent. `Failed` may recover to `Completed` on a retry
/// (the storage key stays bound); `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "upload_status", rename_all = "lowercase")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadStatus {
    Pending,
    Completed,
    Failed,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        self == UploadStatus::Completed
    }
}

/// A file attached to an order, customer-uploaded or staff-processed.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderFile {
    pub id: Uuid,
    pub order_id: Uuid,
    pub kind: FileKind,
    /// Original client-supplied name; untrusted, display and key derivation only.
    pub file_name: String,
    /// Client-declared size; not verified against the stored bytes.
    pub file_size: i64,
    pub mime_type: String,
    /// Deterministic object-store path, assigned once at reservation.
    pub storage_key: String,
    /// Empty until the upload is confirmed.
    pub storage_url: String,
    pub status: UploadStatus,
    pub uploaded_by: Uuid,
    /// Staff annotation (processed files only).
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_kind() -> FileKind {
    FileKind::Customer
}

/// Request to reserve an upload slot and obtain a signed PUT URL
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ReserveUploadRequest {
    /// Original filename
    #[validate(length(
        min = 1,
        max = 255,
        message = "File name must be between 1 and 255 characters"
    ))]
    pub file_name: String,
    /// File size in bytes
    #[validate(range(min = 1, message = "File size must be at least 1 byte"))]
    pub file_size: i64,
    /// Content type (MIME type)
    #[validate(length(
        min = 1,
        max = 255,
        message = "MIME type must be between 1 and 255 characters"
    ))]
    pub mime_type: String,
    /// File kind ("customer" or "processed")
    #[serde(default = "default_kind")]
    pub kind: FileKind,
    /// Optional staff annotation (processed files only)
    #[serde(default)]
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

/// Response containing the signed PUT URL and the reserved record
#[derive(Debug, Serialize, ToSchema)]
pub struct ReserveUploadResponse {
    /// File ID (used to confirm the upload)
    pub file_id: Uuid,
    /// Signed URL for a direct PUT to the object store
    pub upload_url: String,
    /// Object-store key the URL is bound to
    pub storage_key: String,
}

/// Request body for confirming an upload. The kind is recoverable from the
/// record; when supplied it must match.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ConfirmUploadRequest {
    #[serde(default)]
    pub kind: Option<FileKind>,
}

/// Response after confirming an upload
#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmUploadResponse {
    pub id: Uuid,
    pub file_name: String,
    pub status: UploadStatus,
    pub kind: FileKind,
}

/// One entry in a batch of signed download links
#[derive(Debug, Serialize, ToSchema)]
pub struct DownloadLink {
    pub file_id: Uuid,
    pub file_name: String,
    pub url: String,
}

/// Batch of signed download links for one order
#[derive(Debug, Serialize, ToSchema)]
pub struct DownloadLinksResponse {
    pub files: Vec<DownloadLink>,
}

/// Public view of an order file (storage internals omitted)
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderFileResponse {
    pub id: Uuid,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub kind: FileKind,
    pub status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<OrderFile> for OrderFileResponse {
    fn from(file: OrderFile) -> Self {
        OrderFileResponse {
            id: file.id,
            file_name: file.file_name,
            file_size: file.file_size,
            mime_type: file.mime_type,
            kind: file.kind,
            status: file.status,
            notes: file.notes,
            created_at: file.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_status_serialization() {
        assert_eq!(
            serde_json::to_string(&UploadStatus::Completed).unwrap(),
            "\"COMPLETED\""
        );
        assert_eq!(
            serde_json::to_string(&UploadStatus::Pending).unwrap(),
            "\"PENDING\""
        );
    }

    #[test]
    fn test_reserve_request_defaults_to_customer_kind() {
        let request: ReserveUploadRequest = serde_json::from_str(
            r#"{"file_name": "model.stl", "file_size": 10000, "mime_type": "model/stl"}"#,
        )
        .unwrap();
        assert_eq!(request.kind, FileKind::Customer);
        assert!(request.notes.is_none());
    }

    #[test]
    fn test_reserve_request_validation() {
        let request = ReserveUploadRequest {
            file_name: "".to_string(),
            file_size: 0,
            mime_type: "".to_string(),
            kind: FileKind::Customer,
            notes: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("file_name"));
        assert!(errors.field_errors().contains_key("file_size"));
        assert!(errors.field_errors().contains_key("mime_type"));
    }

    #[test]
    fn test_completed_is_the_only_terminal_status() {
        assert!(UploadStatus::Completed.is_terminal());
        assert!(!UploadStatus::Pending.is_terminal());
        assert!(!UploadStatus::Failed.is_terminal());
    }
}
