use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use printdesk_core::models::{ReserveUploadRequest, ReserveUploadResponse};
use std::sync::Arc;
use uuid::Uuid;

/// Reserve an upload slot and obtain a signed PUT URL for a direct upload
/// to the object store. The file record starts PENDING and becomes visible
/// only after a successful confirm.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_id}/upload-url",
    tag = "uploads",
    params(("order_id" = Uuid, Path, description = "Order ID")),
    request_body = ReserveUploadRequest,
    responses(
        (status = 200, description = "Upload slot reserved", body = ReserveUploadResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(
        principal_id = %auth.principal.id,
        order_id = %order_id,
        kind = ?request.kind,
        operation = "reserve_upload"
    )
)]
pub async fn reserve_upload(
    auth: AuthContext,
    Path(order_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ReserveUploadRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let response = state
        .uploads
        .reserve(order_id, auth.principal, request)
        .await?;

    Ok(Json(response))
}
