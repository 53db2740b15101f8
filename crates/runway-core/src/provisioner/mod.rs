//! Single-call provisioning: generate an id, build the bundle, apply it.
mod config;
pub use config::TimeoutConfig;

use std::sync::Arc;
use std::time::Instant;

use runway_model::{InventoryResponse, ProvisioningPolicy, RunnerId};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::applier::{ApplyOutcome, BundleApplier};
use crate::builder::build_bundle;
use crate::control::ControlPlane;
use crate::error::ProvisionError;
use crate::identity::IdentityGenerator;
use crate::inventory::collect_inventory;
use crate::metrics::{MetricsHandle, ProvisionOutcome, noop_metrics};

/// Entry point of the orchestration core.
///
/// Holds only read-only state (policy, generator, timeouts) and a handle to the control
/// plane, so one instance can serve any number of concurrent requests.
#[derive(Clone)]
pub struct Provisioner {
    policy: Arc<ProvisioningPolicy>,
    plane: Arc<dyn ControlPlane>,
    identity: IdentityGenerator,
    timeouts: TimeoutConfig,
    metrics: MetricsHandle,
}

impl Provisioner {
    /// Create a provisioner after validating `policy`.
    pub fn new(
        policy: ProvisioningPolicy,
        plane: Arc<dyn ControlPlane>,
    ) -> Result<Self, ProvisionError> {
        policy.validate()?;
        Ok(Self {
            policy: Arc::new(policy),
            plane,
            identity: IdentityGenerator::default(),
            timeouts: TimeoutConfig::default(),
            metrics: noop_metrics(),
        })
    }

    pub fn with_identity(mut self, identity: IdentityGenerator) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Result<Self, ProvisionError> {
        timeouts.validate()?;
        self.timeouts = timeouts;
        Ok(self)
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn policy(&self) -> &ProvisioningPolicy {
        &self.policy
    }

    pub fn timeouts(&self) -> TimeoutConfig {
        self.timeouts
    }

    /// Provision one runner. Returns its id once all three members exist.
    pub async fn provision(&self) -> Result<RunnerId, ProvisionError> {
        self.provision_with_cancel(&CancellationToken::new()).await
    }

    /// Like [`Provisioner::provision`], stopping early when `cancel` fires.
    ///
    /// Cancellation and the request deadline both abort the create sequence and run the
    /// usual rollback; the error then reports [`crate::ControlPlaneError::Cancelled`].
    pub async fn provision_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> Result<RunnerId, ProvisionError> {
        let started = Instant::now();
        self.metrics.record_provision_started();

        let (outcome, result) = match self.identity.generate() {
            Ok(id) => self.run(id, cancel).await,
            Err(e) => {
                warn!(error = %e, "runner id generation exhausted");
                (ProvisionOutcome::Exhausted, Err(e.into()))
            }
        };

        let elapsed = started.elapsed().as_millis() as u64;
        self.metrics.record_provision_completed(outcome, elapsed);
        result
    }

    #[instrument(level = "info", skip(self, id, cancel), fields(runner = %id))]
    async fn run(
        &self,
        id: RunnerId,
        cancel: &CancellationToken,
    ) -> (ProvisionOutcome, Result<RunnerId, ProvisionError>) {
        let mut bundle = build_bundle(&id, &self.policy);
        bundle.stamp_claim(&Uuid::new_v4().simple().to_string());
        let applier = BundleApplier::new(Arc::clone(&self.plane), self.timeouts.call_timeout())
            .with_metrics(Arc::clone(&self.metrics));

        let token = cancel.child_token();
        let apply = applier.apply(&bundle, &token);
        tokio::pin!(apply);

        let outcome = tokio::select! {
            outcome = &mut apply => outcome,
            _ = tokio::time::sleep(self.timeouts.request_deadline()) => {
                warn!(deadline = ?self.timeouts.request_deadline(), "request deadline elapsed; cancelling");
                token.cancel();
                apply.await
            }
        };

        match outcome {
            ApplyOutcome::Committed => {
                info!(host = %bundle.hostname(), "runner provisioned");
                (ProvisionOutcome::Committed, Ok(id))
            }
            ApplyOutcome::RolledBack(failure) => {
                warn!(stage = %failure.stage, error = %failure.cause, "provisioning failed; bundle rolled back");
                (
                    ProvisionOutcome::RolledBack,
                    Err(ProvisionError::RolledBack {
                        runner: id,
                        stage: failure.stage,
                        cause: failure.cause,
                    }),
                )
            }
            ApplyOutcome::OrphanedPartial { failure, orphans } => {
                error!(
                    stage = %failure.stage,
                    error = %failure.cause,
                    orphans = orphans.len(),
                    "provisioning failed; resources orphaned"
                );
                (
                    ProvisionOutcome::Orphaned,
                    Err(ProvisionError::Orphaned {
                        runner: id,
                        stage: failure.stage,
                        cause: failure.cause,
                        orphans,
                    }),
                )
            }
        }
    }

    /// Every runner bundle currently present in the policy namespace.
    pub async fn inventory(&self) -> Result<InventoryResponse, ProvisionError> {
        collect_inventory(
            self.plane.as_ref(),
            &self.policy.namespace,
            self.timeouts.call_timeout(),
        )
        .await
        .map_err(ProvisionError::Inventory)
    }
}
