//! Bundle application against a [`ControlPlane`].
//!
//! Members are created route-first (route, service, workload). The first failing create
//! is fatal: members already created are deleted again in reverse order before the
//! failure is reported. Deletes that fail leave orphans, which are reported separately.
//!
//! A create abandoned without an answer may or may not have landed, and may have lost a
//! name race. Before such a member is deleted its labels are read back, and it is only
//! removed when it carries this bundle's claim.
mod state;
pub use state::{BUNDLE_SIZE, BundleState};

use std::sync::Arc;
use std::time::Duration;

use runway_model::{BundleMember, LABEL_CLAIM, ResourceKey, ResourceKind, RunnerBundle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, warn};

use crate::control::{ControlPlane, ControlPlaneError};
use crate::metrics::{MetricsHandle, noop_metrics};
use state::StateTracker;

/// The create that ended an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyFailure {
    /// Member whose create failed.
    pub stage: ResourceKind,
    pub cause: ControlPlaneError,
}

/// A member that could not be removed during rollback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanedResource {
    pub key: ResourceKey,
    pub cause: ControlPlaneError,
}

/// Terminal result of [`BundleApplier::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// All three members were created.
    Committed,
    /// A create failed; every member created by this application was removed.
    RolledBack(ApplyFailure),
    /// A create failed and rollback left members behind.
    OrphanedPartial {
        failure: ApplyFailure,
        orphans: Vec<OrphanedResource>,
    },
}

impl ApplyOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, ApplyOutcome::Committed)
    }

    pub fn state(&self) -> BundleState {
        match self {
            ApplyOutcome::Committed => BundleState::Committed,
            ApplyOutcome::RolledBack(_) => BundleState::RolledBack,
            ApplyOutcome::OrphanedPartial { .. } => BundleState::OrphanedPartial,
        }
    }
}

/// A member scheduled for rollback.
struct Created {
    key: ResourceKey,
    /// The create never answered; ownership must be checked before deleting.
    unconfirmed: bool,
}

/// Drives the create/rollback sequence of one bundle.
///
/// Every control-plane call is bounded by `call_timeout`. Creates also stop on the
/// cancellation token; rollback deletes ignore it so a cancelled request still cleans up.
#[derive(Clone)]
pub struct BundleApplier {
    plane: Arc<dyn ControlPlane>,
    call_timeout: Duration,
    metrics: MetricsHandle,
}

impl BundleApplier {
    pub fn new(plane: Arc<dyn ControlPlane>, call_timeout: Duration) -> Self {
        Self {
            plane,
            call_timeout,
            metrics: noop_metrics(),
        }
    }

    pub fn with_metrics(mut self, metrics: MetricsHandle) -> Self {
        self.metrics = metrics;
        self
    }

    /// Create every member of `bundle`, rolling back on the first failure.
    #[instrument(level = "debug", skip_all, fields(runner = %bundle.id, plane = self.plane.name()))]
    pub async fn apply(&self, bundle: &RunnerBundle, cancel: &CancellationToken) -> ApplyOutcome {
        let mut tracker = StateTracker::new(&bundle.id);
        let mut created: Vec<Created> = Vec::with_capacity(BUNDLE_SIZE as usize);

        for (step, member) in (1..=BUNDLE_SIZE).zip(bundle.members()) {
            tracker.advance(BundleState::Creating(step));

            let (result, sent) = self.create(member, cancel).await;
            let cause = match result {
                Ok(()) => {
                    debug!(key = %member.key(), "created");
                    created.push(Created {
                        key: member.key(),
                        unconfirmed: false,
                    });
                    continue;
                }
                Err(cause) => cause,
            };

            warn!(key = %member.key(), error = %cause, "create failed; rolling back");
            self.metrics
                .record_control_plane_error(member.kind().as_str(), cause.kind());
            if sent && cause.is_indeterminate() {
                created.push(Created {
                    key: member.key(),
                    unconfirmed: true,
                });
            }

            let failure = ApplyFailure {
                stage: member.kind(),
                cause,
            };
            tracker.advance(BundleState::RollingBack);
            let orphans = self.rollback(&created, bundle.claim()).await;

            let outcome = if orphans.is_empty() {
                ApplyOutcome::RolledBack(failure)
            } else {
                ApplyOutcome::OrphanedPartial { failure, orphans }
            };
            tracker.advance(outcome.state());
            return outcome;
        }

        tracker.advance(BundleState::Committed);
        debug_assert!(tracker.state().is_terminal());
        ApplyOutcome::Committed
    }

    /// Returns the call result and whether the request reached the control plane.
    async fn create(
        &self,
        member: BundleMember<'_>,
        cancel: &CancellationToken,
    ) -> (Result<(), ControlPlaneError>, bool) {
        if cancel.is_cancelled() {
            return (Err(ControlPlaneError::Cancelled), false);
        }
        let call = tokio::time::timeout(self.call_timeout, self.plane.create(member));
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ControlPlaneError::Cancelled),
            res = call => res.unwrap_or(Err(ControlPlaneError::Timeout(self.call_timeout))),
        };
        (result, true)
    }

    /// Delete `created` in reverse order; returns what could not be removed.
    async fn rollback(&self, created: &[Created], claim: Option<&str>) -> Vec<OrphanedResource> {
        let mut orphans = Vec::new();
        for Created { key, unconfirmed } in created.iter().rev() {
            if *unconfirmed {
                match self.owned(key, claim).await {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(cause) => {
                        orphans.push(self.orphan(key, cause));
                        continue;
                    }
                }
            }

            let result = tokio::time::timeout(self.call_timeout, self.plane.delete(key))
                .await
                .unwrap_or(Err(ControlPlaneError::Timeout(self.call_timeout)));

            match result {
                Ok(()) => debug!(%key, "rolled back"),
                Err(ControlPlaneError::NotFound { .. }) => debug!(%key, "already gone"),
                Err(cause) => orphans.push(self.orphan(key, cause)),
            }
        }
        orphans
    }

    /// Whether the object at `key` exists and carries `claim`.
    async fn owned(&self, key: &ResourceKey, claim: Option<&str>) -> Result<bool, ControlPlaneError> {
        let labels = tokio::time::timeout(self.call_timeout, self.plane.labels(key))
            .await
            .unwrap_or(Err(ControlPlaneError::Timeout(self.call_timeout)))?;

        match labels {
            None => {
                debug!(%key, "abandoned create never landed");
                Ok(false)
            }
            Some(labels) if labels.get(LABEL_CLAIM) == claim => Ok(true),
            Some(labels) => {
                warn!(
                    %key,
                    holder = labels.get(LABEL_CLAIM).unwrap_or("<none>"),
                    "abandoned create lost a name race; object left to its owner"
                );
                Ok(false)
            }
        }
    }

    fn orphan(&self, key: &ResourceKey, cause: ControlPlaneError) -> OrphanedResource {
        let kind = key.kind.as_str();
        error!(
            orphaned = kind,
            name = %key.name,
            namespace = %key.namespace,
            error = %cause,
            "rollback failed; resource orphaned"
        );
        self.metrics.record_control_plane_error(kind, cause.kind());
        self.metrics.record_orphaned_resource(kind);
        OrphanedResource {
            key: key.clone(),
            cause,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_bundle;
    use crate::control::memory::{Fault, InMemoryControlPlane, Operation};
    use runway_model::ProvisioningPolicy;

    const NS: &str = "runners";

    fn setup() -> (InMemoryControlPlane, BundleApplier, RunnerBundle) {
        let plane = InMemoryControlPlane::new();
        let applier = BundleApplier::new(Arc::new(plane.clone()), Duration::from_secs(1));
        let mut bundle = build_bundle(&"abcdefghij".parse().unwrap(), &ProvisioningPolicy::default());
        bundle.stamp_claim("mine");
        (plane, applier, bundle)
    }

    fn deleted(plane: &InMemoryControlPlane) -> Vec<ResourceKind> {
        plane
            .calls_of(Operation::Delete)
            .into_iter()
            .map(|c| c.kind)
            .collect()
    }

    #[tokio::test]
    async fn commits_all_members_route_first() {
        let (plane, applier, bundle) = setup();

        let outcome = applier.apply(&bundle, &CancellationToken::new()).await;

        assert_eq!(outcome, ApplyOutcome::Committed);
        assert_eq!(plane.len(), 3);
        let order: Vec<_> = plane.calls().into_iter().map(|c| c.kind).collect();
        assert_eq!(
            order,
            vec![ResourceKind::Route, ResourceKind::Service, ResourceKind::Workload]
        );
    }

    #[tokio::test]
    async fn workload_conflict_rolls_back_in_reverse() {
        let (plane, applier, bundle) = setup();
        plane.inject(Operation::Create, ResourceKind::Workload, Fault::AlreadyExists);

        let outcome = applier.apply(&bundle, &CancellationToken::new()).await;

        match outcome {
            ApplyOutcome::RolledBack(f) => {
                assert_eq!(f.stage, ResourceKind::Workload);
                assert!(matches!(f.cause, ControlPlaneError::AlreadyExists { .. }));
            }
            other => panic!("expected rollback, got {other:?}"),
        }
        assert!(plane.is_empty());
        assert_eq!(deleted(&plane), vec![ResourceKind::Service, ResourceKind::Route]);
    }

    #[tokio::test]
    async fn first_member_failure_deletes_nothing() {
        let (plane, applier, bundle) = setup();
        plane.inject(
            Operation::Create,
            ResourceKind::Route,
            Fault::Rejected("admission denied".into()),
        );

        let outcome = applier.apply(&bundle, &CancellationToken::new()).await;

        assert_eq!(outcome.state(), BundleState::RolledBack);
        assert!(deleted(&plane).is_empty());
        assert!(plane.is_empty());
    }

    #[tokio::test]
    async fn conflicting_member_of_another_owner_is_never_deleted() {
        let (plane, applier, bundle) = setup();
        plane.seed(BundleMember::Service(&bundle.service));

        let outcome = applier.apply(&bundle, &CancellationToken::new()).await;

        assert_eq!(outcome.state(), BundleState::RolledBack);
        assert_eq!(deleted(&plane), vec![ResourceKind::Route]);
        assert!(plane.service(NS, "abcdefghij").is_some());
    }

    #[tokio::test]
    async fn not_found_on_delete_counts_as_removed() {
        let (plane, applier, bundle) = setup();
        plane.inject(Operation::Create, ResourceKind::Workload, Fault::Transport("reset".into()));
        plane.inject(Operation::Delete, ResourceKind::Service, Fault::NotFound);

        let outcome = applier.apply(&bundle, &CancellationToken::new()).await;

        assert_eq!(outcome.state(), BundleState::RolledBack);
    }

    #[tokio::test]
    async fn failed_delete_reports_orphan() {
        let (plane, applier, bundle) = setup();
        plane.inject(Operation::Create, ResourceKind::Workload, Fault::Transport("reset".into()));
        plane.inject(Operation::Delete, ResourceKind::Route, Fault::Transport("reset".into()));

        let outcome = applier.apply(&bundle, &CancellationToken::new()).await;

        match outcome {
            ApplyOutcome::OrphanedPartial { failure, orphans } => {
                assert_eq!(failure.stage, ResourceKind::Workload);
                assert_eq!(orphans.len(), 1);
                assert_eq!(orphans[0].key, ResourceKey::new(ResourceKind::Route, NS, "abcdefghij"));
            }
            other => panic!("expected orphans, got {other:?}"),
        }
        assert!(plane.route(NS, "abcdefghij").is_some());
        assert!(plane.service(NS, "abcdefghij").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn hung_create_that_never_landed_is_skipped() {
        let (plane, applier, bundle) = setup();
        plane.inject(Operation::Create, ResourceKind::Service, Fault::Hang);

        let outcome = applier.apply(&bundle, &CancellationToken::new()).await;

        match outcome {
            ApplyOutcome::RolledBack(f) => {
                assert_eq!(f.stage, ResourceKind::Service);
                assert_eq!(f.cause, ControlPlaneError::Timeout(Duration::from_secs(1)));
            }
            other => panic!("expected rollback, got {other:?}"),
        }
        assert_eq!(plane.calls_of(Operation::Get).len(), 1);
        assert_eq!(deleted(&plane), vec![ResourceKind::Route]);
        assert!(plane.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_create_that_landed_is_deleted() {
        let (plane, applier, bundle) = setup();
        plane.inject(Operation::Create, ResourceKind::Service, Fault::Lost);

        let outcome = applier.apply(&bundle, &CancellationToken::new()).await;

        assert_eq!(outcome.state(), BundleState::RolledBack);
        assert_eq!(deleted(&plane), vec![ResourceKind::Service, ResourceKind::Route]);
        assert!(plane.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_create_never_deletes_the_race_winner() {
        let (plane, applier, bundle) = setup();
        let mut winner = bundle.clone();
        winner.stamp_claim("theirs");
        plane.seed(BundleMember::Service(&winner.service));
        plane.inject(Operation::Create, ResourceKind::Service, Fault::Lost);

        let outcome = applier.apply(&bundle, &CancellationToken::new()).await;

        assert_eq!(outcome.state(), BundleState::RolledBack);
        assert_eq!(deleted(&plane), vec![ResourceKind::Route]);
        assert_eq!(plane.service(NS, "abcdefghij"), Some(winner.service));
    }

    #[tokio::test(start_paused = true)]
    async fn unreadable_abandoned_member_is_orphaned() {
        let (plane, applier, bundle) = setup();
        plane.inject(Operation::Create, ResourceKind::Service, Fault::Lost);
        plane.inject(Operation::Get, ResourceKind::Service, Fault::Transport("reset".into()));

        let outcome = applier.apply(&bundle, &CancellationToken::new()).await;

        match outcome {
            ApplyOutcome::OrphanedPartial { orphans, .. } => {
                assert_eq!(orphans.len(), 1);
                assert_eq!(orphans[0].key.kind, ResourceKind::Service);
            }
            other => panic!("expected orphans, got {other:?}"),
        }
        assert_eq!(deleted(&plane), vec![ResourceKind::Route]);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_delete_is_bounded_and_orphans() {
        let (plane, applier, bundle) = setup();
        plane.inject(Operation::Create, ResourceKind::Workload, Fault::AlreadyExists);
        plane.inject(Operation::Delete, ResourceKind::Service, Fault::Hang);

        let outcome = applier.apply(&bundle, &CancellationToken::new()).await;

        match outcome {
            ApplyOutcome::OrphanedPartial { orphans, .. } => {
                assert_eq!(orphans.len(), 1);
                assert_eq!(orphans[0].key.kind, ResourceKind::Service);
                assert!(orphans[0].cause.is_indeterminate());
            }
            other => panic!("expected orphans, got {other:?}"),
        }
        assert!(plane.route(NS, "abcdefghij").is_none());
    }

    #[tokio::test]
    async fn cancelled_before_start_touches_nothing() {
        let (plane, applier, bundle) = setup();
        let token = CancellationToken::new();
        token.cancel();

        let outcome = applier.apply(&bundle, &token).await;

        assert_eq!(
            outcome,
            ApplyOutcome::RolledBack(ApplyFailure {
                stage: ResourceKind::Route,
                cause: ControlPlaneError::Cancelled,
            })
        );
        assert!(plane.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_mid_sequence_rolls_back() {
        let plane = InMemoryControlPlane::new();
        let applier = BundleApplier::new(Arc::new(plane.clone()), Duration::from_secs(60));
        let mut bundle = build_bundle(&"abcdefghij".parse().unwrap(), &ProvisioningPolicy::default());
        bundle.stamp_claim("mine");
        plane.inject(Operation::Create, ResourceKind::Workload, Fault::Hang);

        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            trigger.cancel();
        });

        let outcome = applier.apply(&bundle, &token).await;

        match outcome {
            ApplyOutcome::RolledBack(f) => {
                assert_eq!(f.stage, ResourceKind::Workload);
                assert_eq!(f.cause, ControlPlaneError::Cancelled);
            }
            other => panic!("expected rollback, got {other:?}"),
        }
        assert!(plane.is_empty());
    }
}
