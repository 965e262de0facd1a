//! Route configuration and setup.

use crate::api_doc::ApiDoc;
use crate::auth::middleware::{auth_middleware, AuthState};
use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Json, Router,
};
use printdesk_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Request bodies are small JSON documents; file bytes never pass through
/// this service.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState::new(&config.jwt_secret));

    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/openapi.json", get(openapi_json));

    let protected_routes = Router::new()
        .route(
            &format!("{}/orders", API_PREFIX),
            post(handlers::orders::create_order).get(handlers::orders::list_orders),
        )
        .route(
            &format!("{}/orders/{{order_id}}", API_PREFIX),
            get(handlers::orders::get_order),
        )
        .route(
            &format!("{}/orders/{{order_id}}/status", API_PREFIX),
            put(handlers::orders::update_order_status),
        )
        .route(
            &format!("{}/orders/{{order_id}}/upload-url", API_PREFIX),
            post(handlers::upload_url::reserve_upload),
        )
        .route(
            &format!(
                "{}/orders/{{order_id}}/files/{{file_id}}/confirm",
                API_PREFIX
            ),
            post(handlers::upload_confirm::confirm_upload),
        )
        .route(
            &format!("{}/orders/{{order_id}}/files/download-urls", API_PREFIX),
            get(handlers::download_urls::get_download_urls),
        )
        .route(
            &format!("{}/storage/probe", API_PREFIX),
            get(handlers::storage_probe::probe_storage),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ));

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(10_000)
        .max(1);

    let app = public_routes
        .merge(protected_routes)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", origin))
            })
            .collect::<Result<Vec<_>, _>>()?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT])
            .allow_headers(Any)
    };
    Ok(cors)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
