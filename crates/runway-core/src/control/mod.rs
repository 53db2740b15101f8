//! Control-plane abstraction used by the applier.
//!
//! Concrete clients (Kubernetes, in-memory) implement [`ControlPlane`]; the core never
//! talks to a cluster directly.
mod error;
pub use error::ControlPlaneError;

pub mod memory;

use async_trait::async_trait;
use runway_model::{BundleMember, Labels, ResourceKey, ResourceKind};

/// Object found by a label-selector listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListedResource {
    pub key: ResourceKey,
    pub labels: Labels,
}

/// Cluster control plane consumed by the orchestrator.
///
/// Every call is keyed by `(namespace, name)` and is atomic per object: `create` is
/// create-if-absent and must answer [`ControlPlaneError::AlreadyExists`] on a name conflict.
/// That conflict is the only cross-request coordination the orchestrator relies on.
///
/// Implementations do not enforce deadlines; the applier wraps every call in one.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Backend name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Create one bundle member.
    async fn create(&self, member: BundleMember<'_>) -> Result<(), ControlPlaneError>;

    /// Delete one object. Answers [`ControlPlaneError::NotFound`] if it does not exist.
    async fn delete(&self, key: &ResourceKey) -> Result<(), ControlPlaneError>;

    /// Labels of one object, or `None` if it does not exist.
    async fn labels(&self, key: &ResourceKey) -> Result<Option<Labels>, ControlPlaneError>;

    /// List objects of `kind` in `namespace` whose labels match `selector`.
    async fn list(
        &self,
        kind: ResourceKind,
        namespace: &str,
        selector: &Labels,
    ) -> Result<Vec<ListedResource>, ControlPlaneError>;
}
