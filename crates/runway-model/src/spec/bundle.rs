use serde::{Deserialize, Serialize};

use crate::{LABEL_CLAIM, ResourceKey, ResourceKind, RouteSpec, RunnerId, ServiceSpec, WorkloadSpec};

/// The three coupled resources realizing one runner.
///
/// Members share one name and one label set; the bundle has no meaning if any member is missing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerBundle {
    pub id: RunnerId,
    pub workload: WorkloadSpec,
    pub service: ServiceSpec,
    pub route: RouteSpec,
}

/// Borrowed view of one bundle member, used to drive generic create/delete loops.
#[derive(Clone, Copy, Debug)]
pub enum BundleMember<'a> {
    Route(&'a RouteSpec),
    Service(&'a ServiceSpec),
    Workload(&'a WorkloadSpec),
}

impl<'a> BundleMember<'a> {
    pub fn kind(&self) -> ResourceKind {
        match self {
            BundleMember::Route(_) => ResourceKind::Route,
            BundleMember::Service(_) => ResourceKind::Service,
            BundleMember::Workload(_) => ResourceKind::Workload,
        }
    }

    pub fn name(&self) -> &'a RunnerId {
        match self {
            BundleMember::Route(r) => &r.name,
            BundleMember::Service(s) => &s.name,
            BundleMember::Workload(w) => &w.name,
        }
    }

    pub fn namespace(&self) -> &'a str {
        match self {
            BundleMember::Route(r) => &r.namespace,
            BundleMember::Service(s) => &s.namespace,
            BundleMember::Workload(w) => &w.namespace,
        }
    }

    /// Address of this member on the control plane.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(self.kind(), self.namespace(), self.name().as_str())
    }
}

impl RunnerBundle {
    /// Members in creation order: route, service, workload.
    ///
    /// Rollback walks the same list backwards.
    pub fn members(&self) -> [BundleMember<'_>; 3] {
        [
            BundleMember::Route(&self.route),
            BundleMember::Service(&self.service),
            BundleMember::Workload(&self.workload),
        ]
    }

    /// Public hostname of the runner.
    pub fn hostname(&self) -> &str {
        &self.route.host
    }

    pub fn namespace(&self) -> &str {
        &self.workload.namespace
    }

    /// Stamp `claim` on the object labels of every member.
    ///
    /// Selectors and pod labels are left alone, so routing is unaffected.
    pub fn stamp_claim(&mut self, claim: &str) {
        self.workload.labels.insert(LABEL_CLAIM, claim);
        self.service.labels.insert(LABEL_CLAIM, claim);
        self.route.labels.insert(LABEL_CLAIM, claim);
    }

    /// Claim stamped by [`RunnerBundle::stamp_claim`], if any.
    pub fn claim(&self) -> Option<&str> {
        self.workload.labels.get(LABEL_CLAIM)
    }
}
