//! Kubernetes control plane for the runner provisioner.
//!
//! Workloads become `apps/v1 Deployment`s, service endpoints `v1 Service`s and routes
//! `networking.k8s.io/v1 Ingress`es. API statuses map onto [`runway_core::ControlPlaneError`].
mod convert;
pub use convert::{to_deployment, to_ingress, to_service};

mod error;
pub use error::KubeError;

mod plane;
pub use plane::KubeControlPlane;

mod status;
pub use status::map_error;
