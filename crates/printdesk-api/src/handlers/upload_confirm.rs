use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use printdesk_core::models::{ConfirmUploadRequest, ConfirmUploadResponse};
use std::sync::Arc;
use uuid::Uuid;

/// Confirm an upload after the client's direct PUT to the object store.
/// Verifies the object actually exists before the record is completed; a
/// store-miss is durably recorded as FAILED.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_id}/files/{file_id}/confirm",
    tag = "uploads",
    params(
        ("order_id" = Uuid, Path, description = "Order ID"),
        ("file_id" = Uuid, Path, description = "File ID from the reserve step")
    ),
    request_body = ConfirmUploadRequest,
    responses(
        (status = 200, description = "Upload settled", body = ConfirmUploadResponse),
        (status = 400, description = "Store miss or cross-order reference", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Order or file not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(
        principal_id = %auth.principal.id,
        order_id = %order_id,
        file_id = %file_id,
        operation = "confirm_upload"
    )
)]
pub async fn confirm_upload(
    auth: AuthContext,
    Path((order_id, file_id)): Path<(Uuid, Uuid)>,
    State(state): State<Arc<AppState>>,
    request: Option<Json<ConfirmUploadRequest>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let declared_kind = request.and_then(|Json(body)| body.kind);

    let response = state
        .uploads
        .confirm(order_id, file_id, auth.principal, declared_kind)
        .await?;

    Ok(Json(response))
}
