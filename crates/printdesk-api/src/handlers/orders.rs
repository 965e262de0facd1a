use crate::auth::models::AuthContext;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use printdesk_core::models::{
    CreateOrderRequest, FileKind, Order, OrderFileResponse, OrderStatus, UpdateOrderStatusRequest,
    UploadStatus,
};
use printdesk_core::{policy, AppError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<OrderStatus>,
}

/// Order with its visible files. Processed files are present only for
/// staff callers.
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetailResponse {
    #[serde(flatten)]
    pub order: Order,
    /// Completed customer uploads; pending/failed reservations are excluded.
    pub files: Vec<OrderFileResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_files: Option<Vec<OrderFileResponse>>,
}

/// Create a new order
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(principal_id = %auth.principal.id))]
pub async fn create_order(
    auth: AuthContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate().map_err(AppError::from)?;

    let order = state
        .orders
        .create(auth.principal.id, &request.description)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// List orders: customers see their own, staff see all
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "orders",
    params(("status" = Option<OrderStatus>, Query, description = "Filter by order status")),
    responses(
        (status = 200, description = "Orders", body = [Order]),
        (status = 401, description = "Unauthenticated", body = ErrorResponse)
    )
)]
pub async fn list_orders(
    auth: AuthContext,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let owner_filter = if auth.principal.is_staff() {
        None
    } else {
        Some(auth.principal.id)
    };

    let orders = state.orders.list(owner_filter, query.status).await?;
    Ok(Json(orders))
}

/// Get one order with its visible files
#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}",
    tag = "orders",
    params(("order_id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order detail", body = OrderDetailResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
pub async fn get_order(
    auth: AuthContext,
    Path(order_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let order = state
        .orders
        .get(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order not found: {}", order_id)))?;

    if !policy::can_read_order(&auth.principal, &order) {
        return Err(HttpAppError(AppError::Forbidden(format!(
            "Principal {} may not read order {}",
            auth.principal.id, order.id
        ))));
    }

    let files = state
        .order_files
        .list_for_order(order.id, FileKind::Customer, Some(UploadStatus::Completed))
        .await?
        .into_iter()
        .map(OrderFileResponse::from)
        .collect();

    let processed_files = if auth.principal.is_staff() {
        let processed = state
            .order_files
            .list_for_order(order.id, FileKind::Processed, Some(UploadStatus::Completed))
            .await?
            .into_iter()
            .map(OrderFileResponse::from)
            .collect();
        Some(processed)
    } else {
        None
    };

    Ok(Json(OrderDetailResponse {
        order,
        files,
        processed_files,
    }))
}

/// Advance an order's status (staff only)
#[utoipa::path(
    put,
    path = "/api/v1/orders/{order_id}/status",
    tag = "orders",
    params(("order_id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order updated", body = Order),
        (status = 400, description = "Invalid transition", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, request), fields(principal_id = %auth.principal.id, order_id = %order_id))]
pub async fn update_order_status(
    auth: AuthContext,
    Path(order_id): Path<Uuid>,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    if !policy::can_update_order_status(&auth.principal) {
        return Err(HttpAppError(AppError::Forbidden(
            "Only staff may change order status".to_string(),
        )));
    }

    let order = state
        .orders
        .get(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order not found: {}", order_id)))?;

    if !order.status.can_transition_to(request.status) {
        return Err(HttpAppError(AppError::InvalidInput(format!(
            "Order cannot move from {:?} to {:?}",
            order.status, request.status
        ))));
    }

    let updated = state.orders.update_status(order.id, request.status).await?;

    tracing::info!(
        order_number = %updated.order_number,
        status = ?updated.status,
        "Order status updated"
    );

    Ok(Json(updated))
}
