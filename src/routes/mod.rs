pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Json, Router};
use http::header::{self, HeaderValue};
use http::Method;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::state::AppState;

const JSON_BODY_LIMIT: usize = 1024 * 1024;
const MULTIPART_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let config = state.config.clone();

    // API responses must never be cached by intermediaries
    let api = Router::new()
        .route("/api/health", get(health_check))
        .merge(auth::routes(state.clone()))
        .merge(dashboard::routes(state.clone()))
        .merge(orders::routes())
        .merge(products::routes().layer(DefaultBodyLimit::max(MULTIPART_BODY_LIMIT)))
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
        .with_state(state);

    Router::new()
        .route("/", get(|| async { "Bistro API" }))
        .merge(api)
        .nest_service("/uploads", ServeDir::new(&config.uploads_dir))
        .layer(cors_layer(&config))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    // A literal wildcard cannot be combined with credentials, so "*" means
    // reflecting whatever origin the request carries.
    let allow_origin = if config.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
