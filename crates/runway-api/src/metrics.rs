use axum::{
    Router,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use runway_prometheus::PrometheusMetrics;

use crate::error::ApiError;

/// `GET /metrics` over the given registry.
pub(crate) fn router(metrics: PrometheusMetrics) -> Router {
    Router::new()
        .route("/metrics", get(render))
        .with_state(metrics)
}

async fn render(State(metrics): State<PrometheusMetrics>) -> Result<Response, ApiError> {
    let body = metrics
        .encode_text()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, metrics.content_type())], body).into_response())
}
