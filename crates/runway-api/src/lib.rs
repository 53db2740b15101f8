//! HTTP surface of the runner provisioner.
//!
//! - `POST /runners` provisions one runner
//! - `GET /runners` lists the bundles found on the control plane
//! - `GET /healthz` liveness
//! - `GET /metrics` Prometheus exposition, when a registry is attached
//! - any other path from a static directory, when one is configured
mod adapter;
pub use adapter::ProvisionerAdapter;

mod error;
pub use error::{ApiError, FailureResponse};

mod handler;
pub use handler::ApiHandler;

mod http;
pub use http::HttpApi;

mod metrics;
