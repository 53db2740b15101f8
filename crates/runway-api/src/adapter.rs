use async_trait::async_trait;
use runway_core::Provisioner;
use runway_model::{InventoryResponse, RunnerId};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::error;

use crate::error::ApiError;
use crate::handler::ApiHandler;

/// [`ApiHandler`] delegating to a [`Provisioner`].
///
/// Each provisioning runs on its own task, so a client that disconnects mid-request does
/// not interrupt the create/rollback sequence. The shutdown token cancels in-flight
/// requests, which then roll back as usual. Tasks are spawned on a [`TaskTracker`]; the
/// owner closes and awaits it before the runtime goes away so no rollback is cut short.
pub struct ProvisionerAdapter {
    provisioner: Provisioner,
    shutdown: CancellationToken,
    tasks: TaskTracker,
}

impl ProvisionerAdapter {
    pub fn new(provisioner: Provisioner) -> Self {
        Self {
            provisioner,
            shutdown: CancellationToken::new(),
            tasks: TaskTracker::new(),
        }
    }

    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn with_tracker(mut self, tasks: TaskTracker) -> Self {
        self.tasks = tasks;
        self
    }

    /// In-flight provisioning tasks.
    pub fn tracker(&self) -> &TaskTracker {
        &self.tasks
    }
}

#[async_trait]
impl ApiHandler for ProvisionerAdapter {
    async fn provision(&self) -> Result<RunnerId, ApiError> {
        let provisioner = self.provisioner.clone();
        let cancel = self.shutdown.child_token();

        self.tasks
            .spawn(async move { provisioner.provision_with_cancel(&cancel).await })
            .await
            .map_err(|e| {
                error!(error = %e, "provisioning task aborted");
                ApiError::Internal(e.to_string())
            })?
            .map_err(ApiError::from)
    }

    async fn list_runners(&self) -> Result<InventoryResponse, ApiError> {
        self.provisioner.inventory().await.map_err(ApiError::from)
    }
}
