use async_trait::async_trait;
use runway_model::{InventoryResponse, RunnerId};

use crate::error::ApiError;

/// Backend of the HTTP surface.
///
/// [`crate::ProvisionerAdapter`] is the production implementation; tests and embedders may
/// provide their own (for auth, quotas, etc.).
#[async_trait]
pub trait ApiHandler: Send + Sync + 'static {
    /// Provision one runner and return its id once every member exists.
    async fn provision(&self) -> Result<RunnerId, ApiError>;

    /// Runner bundles currently present on the control plane.
    async fn list_runners(&self) -> Result<InventoryResponse, ApiError>;
}
