use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use printdesk_core::models::{DownloadLinksResponse, FileKind};
use printdesk_core::{policy, AppError};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

fn default_kind() -> FileKind {
    FileKind::Customer
}

#[derive(Debug, Deserialize)]
pub struct DownloadUrlsQuery {
    #[serde(default = "default_kind")]
    pub kind: FileKind,
}

/// Batch-issue short-lived signed GET URLs for an order's completed files
/// of one kind. All-or-nothing: one failed issuance fails the call.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}/files/download-urls",
    tag = "downloads",
    params(
        ("order_id" = Uuid, Path, description = "Order ID"),
        ("kind" = Option<FileKind>, Query, description = "File kind (default: customer)")
    ),
    responses(
        (status = 200, description = "Signed download URLs", body = DownloadLinksResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(principal_id = %auth.principal.id, order_id = %order_id, kind = ?query.kind)
)]
pub async fn get_download_urls(
    auth: AuthContext,
    Path(order_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    Query(query): Query<DownloadUrlsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let order = state
        .orders
        .get(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order not found: {}", order_id)))?;

    if !policy::can_download_files(&auth.principal, &order, query.kind) {
        return Err(HttpAppError(AppError::Forbidden(format!(
            "Principal {} may not download {:?} files for order {}",
            auth.principal.id, query.kind, order.id
        ))));
    }

    let files = state.downloads.issue_batch(order.id, query.kind).await?;

    Ok(Json(DownloadLinksResponse { files }))
}
