// GET handlers: landing page, metrics, version, api/scrape

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};

use super::AppState;
use crate::metrics;
use crate::version::{NAME, VERSION, version_string};

/// GET /: small HTML page linking to the metrics path.
pub(super) async fn landing_page_handler(State(state): State<AppState>) -> impl IntoResponse {
    let path = &state.config.server.metrics_path;
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>ZFS Exporter</title></head>\n<body>\n\
         <h1>ZFS Exporter</h1>\n<p>{}</p>\n<p><a href=\"{path}\">Metrics</a></p>\n</body>\n</html>",
        version_string()
    ))
}

/// GET <metrics_path>: runs one scrape and renders it as Prometheus text.
pub(super) async fn metrics_handler(State(state): State<AppState>) -> Response {
    let scrape = state.collector.collect().await;
    match metrics::render(&scrape) {
        Ok(body) => ([(header::CONTENT_TYPE, metrics::CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, operation = "render_metrics", "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/scrape: one scrape as JSON, with per-source warnings.
pub(super) async fn api_scrape_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.collector.collect().await.report())
}
