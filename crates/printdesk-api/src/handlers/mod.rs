pub mod download_urls;
pub mod orders;
pub mod storage_probe;
pub mod upload_confirm;
pub mod upload_url;
