use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use printdesk_core::models::FileKind;
use printdesk_core::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

const PROBE_URL_TTL: Duration = Duration::from_secs(300);

#[derive(Debug, Deserialize)]
pub struct StorageProbeQuery {
    /// Probe a specific key; without it a throwaway key is derived and
    /// signing plus a negative existence check are exercised.
    pub key: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StorageProbeResponse {
    pub storage_key: String,
    pub exists: bool,
    /// Whether a signed upload URL could be issued (self-test mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_url_issued: Option<bool>,
}

/// Diagnostic existence probe against the object store (staff only).
///
/// Surfaces configuration faults loudly: a broken endpoint or credential
/// pair fails here instead of at the next customer upload.
#[utoipa::path(
    get,
    path = "/api/v1/storage/probe",
    tag = "storage",
    params(("key" = Option<String>, Query, description = "Storage key to probe")),
    responses(
        (status = 200, description = "Probe result", body = StorageProbeResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 500, description = "Storage fault", body = ErrorResponse)
    )
)]
pub async fn probe_storage(
    auth: AuthContext,
    State(state): State<Arc<AppState>>,
    Query(query): Query<StorageProbeQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !auth.principal.is_staff() {
        return Err(HttpAppError(AppError::Forbidden(
            "Only staff may probe storage".to_string(),
        )));
    }

    if let Some(key) = query.key {
        let exists = state.storage.exists(&key).await.map_err(HttpAppError::from)?;
        return Ok(Json(StorageProbeResponse {
            storage_key: key,
            exists,
            upload_url_issued: None,
        }));
    }

    // Self-test: sign an upload URL for a key that is never uploaded to,
    // then verify the store reports it absent.
    let probe_key =
        printdesk_storage::derive_key(auth.principal.id, "probe.txt", FileKind::Processed);

    state
        .storage
        .issue_upload_url(&probe_key, PROBE_URL_TTL)
        .await
        .map_err(HttpAppError::from)?;

    let exists = state
        .storage
        .exists(&probe_key)
        .await
        .map_err(HttpAppError::from)?;

    tracing::info!(storage_key = %probe_key, exists, "Storage self-test completed");

    Ok(Json(StorageProbeResponse {
        storage_key: probe_key,
        exists,
        upload_url_issued: Some(true),
    }))
}
