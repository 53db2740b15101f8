//! Prometheus backend for the provisioner's [`runway_core::MetricsBackend`].
//!
//! ```rust
//! use std::sync::Arc;
//! use runway_prometheus::PrometheusMetrics;
//!
//! # fn main() -> Result<(), prometheus::Error> {
//! let metrics = PrometheusMetrics::new()?;
//! let handle: runway_core::MetricsHandle = Arc::new(metrics.clone());
//! # let _ = handle;
//! let body = metrics.encode_text()?;
//! assert!(body.is_empty() || body.contains("runway_"));
//! # Ok(())
//! # }
//! ```
//!
//! Serving `/metrics` is left to the HTTP layer; see `runway-api`.
mod backend;
pub use backend::PrometheusMetrics;
