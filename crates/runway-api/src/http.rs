use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use runway_model::{InventoryResponse, ProvisionResponse};
use runway_prometheus::PrometheusMetrics;
use tower_http::services::ServeDir;
use tracing::debug;

use crate::{error::ApiError, handler::ApiHandler, metrics};

/// HTTP API builder.
pub struct HttpApi<H> {
    handler: Arc<H>,
    metrics: Option<PrometheusMetrics>,
    static_dir: Option<PathBuf>,
}

impl<H> HttpApi<H>
where
    H: ApiHandler,
{
    pub fn new(handler: Arc<H>) -> Self {
        Self {
            handler,
            metrics: None,
            static_dir: None,
        }
    }

    /// Serve `GET /metrics` from this registry.
    pub fn with_metrics(mut self, metrics: PrometheusMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Serve files under `dir` for every path the API does not claim; `/` maps to
    /// `index.html`.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Routes:
    /// - POST /runners
    /// - GET /runners
    /// - GET /healthz
    /// - GET /metrics (only with [`HttpApi::with_metrics`])
    /// - anything else from the static directory (only with [`HttpApi::with_static_dir`])
    pub fn router(self) -> Router {
        let api = Router::new()
            .route("/runners", post(provision::<H>).get(list_runners::<H>))
            .route("/healthz", get(healthz))
            .with_state(self.handler);

        let api = match self.metrics {
            Some(m) => api.merge(metrics::router(m)),
            None => api,
        };
        match self.static_dir {
            Some(dir) => api.fallback_service(ServeDir::new(dir)),
            None => api,
        }
    }
}

/// POST /runners
async fn provision<H>(State(handler): State<Arc<H>>) -> Result<Json<ProvisionResponse>, ApiError>
where
    H: ApiHandler,
{
    let id = handler.provision().await?;
    debug!(runner = %id, "provision request served");
    Ok(Json(ProvisionResponse::committed(id)))
}

/// GET /runners
async fn list_runners<H>(
    State(handler): State<Arc<H>>,
) -> Result<Json<InventoryResponse>, ApiError>
where
    H: ApiHandler,
{
    Ok(Json(handler.list_runners().await?))
}

/// GET /healthz
async fn healthz() -> &'static str {
    "ok"
}
