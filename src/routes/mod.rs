// HTTP routes: landing page, metrics exposition, version, JSON scrape

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::collector::Collector;
use crate::config::AppConfig;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) collector: Arc<Collector>,
    pub(crate) config: AppConfig,
}

pub fn app(collector: Arc<Collector>, config: AppConfig) -> Router {
    let metrics_path = config.server.metrics_path.clone();
    let state = AppState { collector, config };
    Router::new()
        .route("/", get(http::landing_page_handler)) // GET /
        .route(&metrics_path, get(http::metrics_handler)) // GET /metrics
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/scrape", get(http::api_scrape_handler)) // GET /api/scrape
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
