use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers::orders::OrderDetailResponse;
use crate::handlers::storage_probe::StorageProbeResponse;
use printdesk_core::models::{
    ConfirmUploadRequest, ConfirmUploadResponse, CreateOrderRequest, DownloadLink,
    DownloadLinksResponse, FileKind, Order, OrderFileResponse, OrderStatus, ReserveUploadRequest,
    ReserveUploadResponse, Role, UpdateOrderStatusRequest, UploadStatus,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::orders::create_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order_status,
        crate::handlers::upload_url::reserve_upload,
        crate::handlers::upload_confirm::confirm_upload,
        crate::handlers::download_urls::get_download_urls,
        crate::handlers::storage_probe::probe_storage,
    ),
    components(schemas(
        CreateOrderRequest,
        UpdateOrderStatusRequest,
        Order,
        OrderStatus,
        OrderDetailResponse,
        OrderFileResponse,
        ReserveUploadRequest,
        ReserveUploadResponse,
        ConfirmUploadRequest,
        ConfirmUploadResponse,
        DownloadLink,
        DownloadLinksResponse,
        FileKind,
        UploadStatus,
        Role,
        StorageProbeResponse,
        ErrorResponse,
    )),
    tags(
        (name = "orders", description = "Order intake and lifecycle"),
        (name = "uploads", description = "Presigned upload handshake"),
        (name = "downloads", description = "Signed download links"),
        (name = "storage", description = "Storage diagnostics")
    ),
    info(
        title = "Printdesk API",
        description = "Order intake and file exchange for a print-on-demand service"
    )
)]
pub struct ApiDoc;
