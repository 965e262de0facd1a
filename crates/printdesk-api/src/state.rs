//! Application state.
//!
//! All coordination state lives in the database and the object store; the
//! state struct only carries handles. Constructed once in setup and shared
//! behind `Arc`.

use printdesk_db::{OrderFileRepository, OrderRepository};
use printdesk_storage::ObjectStorage;
use std::sync::Arc;

use crate::services::downloads::DownloadLinkService;
use crate::services::upload::UploadSessionService;

#[derive(Clone)]
pub struct AppState {
    pub orders: OrderRepository,
    pub order_files: OrderFileRepository,
    pub storage: Arc<dyn ObjectStorage>,
    pub uploads: UploadSessionService,
    pub downloads: DownloadLinkService,
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
