pub mod order;
pub mod order_file;
pub mod principal;

pub use order::{CreateOrderRequest, Order, OrderStatus, UpdateOrderStatusRequest};
pub use order_file::{
    ConfirmUploadRequest, ConfirmUploadResponse, DownloadLink, DownloadLinksResponse, FileKind,
    OrderFile, OrderFileResponse, ReserveUploadRequest, ReserveUploadResponse, UploadStatus,
};
pub use principal::{JwtClaims, Principal, Role};
