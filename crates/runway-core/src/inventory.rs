//! Read-side view of the runner bundles present on the control plane.
//!
//! There is no registry besides the control plane itself: bundles are found by listing
//! every member kind with `app=runner` and grouping by the `id` label.
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use runway_model::{InventoryResponse, LABEL_ID, Labels, ResourceKind, RunnerSummary};
use tracing::debug;

use crate::applier::BUNDLE_SIZE;
use crate::control::{ControlPlane, ControlPlaneError};

/// List every runner bundle in `namespace`, complete or not.
///
/// Objects without an `id` label are grouped under their own name. Runners are sorted by id.
pub async fn collect_inventory(
    plane: &dyn ControlPlane,
    namespace: &str,
    call_timeout: Duration,
) -> Result<InventoryResponse, ControlPlaneError> {
    let selector = Labels::all_runners();
    let mut found: BTreeMap<String, BTreeSet<ResourceKind>> = BTreeMap::new();

    for kind in ResourceKind::ALL {
        let listed = tokio::time::timeout(call_timeout, plane.list(kind, namespace, &selector))
            .await
            .unwrap_or(Err(ControlPlaneError::Timeout(call_timeout)))?;
        debug!(%kind, count = listed.len(), "listed runner resources");

        for res in listed {
            let id = res
                .labels
                .get(LABEL_ID)
                .map(str::to_string)
                .unwrap_or(res.key.name);
            found.entry(id).or_default().insert(kind);
        }
    }

    let runners = found
        .into_iter()
        .map(|(id, members)| RunnerSummary {
            id,
            complete: members.len() == BUNDLE_SIZE as usize,
            members: members.into_iter().collect(),
        })
        .collect();
    Ok(InventoryResponse { runners })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_bundle;
    use crate::control::memory::{Fault, InMemoryControlPlane, Operation};
    use runway_model::{BundleMember, ProvisioningPolicy};

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn groups_members_by_id() {
        let plane = InMemoryControlPlane::new();
        let policy = ProvisioningPolicy::default();
        let full = build_bundle(&"bbb".parse().unwrap(), &policy);
        let partial = build_bundle(&"aaa".parse().unwrap(), &policy);
        for m in full.members() {
            plane.seed(m);
        }
        plane.seed(BundleMember::Route(&partial.route));

        let inv = collect_inventory(&plane, "runners", TIMEOUT).await.unwrap();

        assert_eq!(
            inv.runners,
            vec![
                RunnerSummary {
                    id: "aaa".into(),
                    members: vec![ResourceKind::Route],
                    complete: false,
                },
                RunnerSummary {
                    id: "bbb".into(),
                    members: vec![ResourceKind::Workload, ResourceKind::Service, ResourceKind::Route],
                    complete: true,
                },
            ]
        );
    }

    #[tokio::test]
    async fn empty_namespace_is_empty_inventory() {
        let plane = InMemoryControlPlane::new();
        let inv = collect_inventory(&plane, "runners", TIMEOUT).await.unwrap();
        assert!(inv.runners.is_empty());
    }

    #[tokio::test]
    async fn list_failure_is_propagated() {
        let plane = InMemoryControlPlane::new();
        plane.inject(Operation::List, ResourceKind::Service, Fault::Transport("down".into()));

        let err = collect_inventory(&plane, "runners", TIMEOUT).await.unwrap_err();
        assert_eq!(err, ControlPlaneError::Transport("down".into()));
    }
}
