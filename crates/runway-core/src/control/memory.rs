//! In-memory control plane with fault injection.
//!
//! Behaves like a real control plane for the calls the orchestrator makes (create-if-absent,
//! delete with not-found, list by labels) and lets callers queue one-shot failures per
//! `(operation, kind)`. Used by tests and by the agent's dry-run mode.
//!
//! The call log keeps the most recent [`CALL_LOG_CAPACITY`] calls only.
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use runway_model::{
    BundleMember, Labels, ResourceKey, ResourceKind, RouteSpec, ServiceSpec, WorkloadSpec,
};
use tracing::trace;

use super::{ControlPlane, ControlPlaneError, ListedResource};

/// Calls kept by the call log; older ones are dropped first.
pub const CALL_LOG_CAPACITY: usize = 1024;

/// Control-plane operation a fault can be attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Delete,
    Get,
    List,
}

/// Failure injected into the next matching call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    AlreadyExists,
    NotFound,
    Rejected(String),
    Transport(String),
    /// Never answer; the caller's deadline has to cut the call.
    Hang,
    /// Carry out the call, then never answer. Only meaningful for create and delete.
    Lost,
}

impl Fault {
    fn into_error(self, key: ResourceKey) -> Option<ControlPlaneError> {
        match self {
            Fault::AlreadyExists => Some(ControlPlaneError::AlreadyExists { key }),
            Fault::NotFound => Some(ControlPlaneError::NotFound { key }),
            Fault::Rejected(reason) => Some(ControlPlaneError::Rejected { key, reason }),
            Fault::Transport(msg) => Some(ControlPlaneError::Transport(msg)),
            Fault::Hang | Fault::Lost => None,
        }
    }
}

/// One observed call, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Call {
    pub op: Operation,
    pub kind: ResourceKind,
    /// Object name; empty for listings.
    pub name: String,
}

/// Stored object, keeping the full spec so tests can inspect what was submitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoredObject {
    Workload(WorkloadSpec),
    Service(ServiceSpec),
    Route(RouteSpec),
}

impl StoredObject {
    pub fn labels(&self) -> &Labels {
        match self {
            StoredObject::Workload(w) => &w.labels,
            StoredObject::Service(s) => &s.labels,
            StoredObject::Route(r) => &r.labels,
        }
    }
}

impl From<BundleMember<'_>> for StoredObject {
    fn from(member: BundleMember<'_>) -> Self {
        match member {
            BundleMember::Workload(w) => StoredObject::Workload(w.clone()),
            BundleMember::Service(s) => StoredObject::Service(s.clone()),
            BundleMember::Route(r) => StoredObject::Route(r.clone()),
        }
    }
}

#[derive(Default)]
struct State {
    objects: BTreeMap<ResourceKey, StoredObject>,
    faults: HashMap<(Operation, ResourceKind), VecDeque<Fault>>,
    calls: VecDeque<Call>,
}

impl State {
    fn begin(&mut self, op: Operation, kind: ResourceKind, name: &str) -> Option<Fault> {
        if self.calls.len() == CALL_LOG_CAPACITY {
            self.calls.pop_front();
        }
        self.calls.push_back(Call {
            op,
            kind,
            name: name.to_string(),
        });
        self.faults
            .get_mut(&(op, kind))
            .and_then(|queue| queue.pop_front())
    }
}

/// Shared in-memory control plane; clones observe the same state.
#[derive(Clone, Default)]
pub struct InMemoryControlPlane {
    inner: Arc<Mutex<State>>,
}

impl InMemoryControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a one-shot fault for the next `op` on `kind`.
    ///
    /// Faults for the same pair are consumed in the order they were queued.
    pub fn inject(&self, op: Operation, kind: ResourceKind, fault: Fault) {
        self.inner
            .lock()
            .faults
            .entry((op, kind))
            .or_default()
            .push_back(fault);
    }

    /// Store an object directly, bypassing faults and the call log.
    pub fn seed(&self, member: BundleMember<'_>) {
        self.inner
            .lock()
            .objects
            .insert(member.key(), StoredObject::from(member));
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.inner.lock().objects.contains_key(key)
    }

    pub fn get(&self, key: &ResourceKey) -> Option<StoredObject> {
        self.inner.lock().objects.get(key).cloned()
    }

    pub fn workload(&self, namespace: &str, name: &str) -> Option<WorkloadSpec> {
        match self.get(&ResourceKey::new(ResourceKind::Workload, namespace, name)) {
            Some(StoredObject::Workload(w)) => Some(w),
            _ => None,
        }
    }

    pub fn service(&self, namespace: &str, name: &str) -> Option<ServiceSpec> {
        match self.get(&ResourceKey::new(ResourceKind::Service, namespace, name)) {
            Some(StoredObject::Service(s)) => Some(s),
            _ => None,
        }
    }

    pub fn route(&self, namespace: &str, name: &str) -> Option<RouteSpec> {
        match self.get(&ResourceKey::new(ResourceKind::Route, namespace, name)) {
            Some(StoredObject::Route(r)) => Some(r),
            _ => None,
        }
    }

    /// Keys of every stored object, sorted.
    pub fn keys(&self) -> Vec<ResourceKey> {
        self.inner.lock().objects.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().objects.is_empty()
    }

    /// Most recent calls, in arrival order.
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.iter().cloned().collect()
    }

    /// Calls of one operation, in arrival order.
    pub fn calls_of(&self, op: Operation) -> Vec<Call> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| c.op == op)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ControlPlane for InMemoryControlPlane {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, member: BundleMember<'_>) -> Result<(), ControlPlaneError> {
        let key = member.key();
        let fault = {
            let mut state = self.inner.lock();
            match state.begin(Operation::Create, key.kind, &key.name) {
                Some(Fault::Lost) => {
                    state
                        .objects
                        .entry(key.clone())
                        .or_insert_with(|| StoredObject::from(member));
                    Some(Fault::Lost)
                }
                Some(fault) => Some(fault),
                None => {
                    if state.objects.contains_key(&key) {
                        return Err(ControlPlaneError::AlreadyExists { key });
                    }
                    trace!(%key, "memory control plane: created");
                    state.objects.insert(key, StoredObject::from(member));
                    return Ok(());
                }
            }
        };
        resolve(fault, key).await
    }

    async fn delete(&self, key: &ResourceKey) -> Result<(), ControlPlaneError> {
        let fault = {
            let mut state = self.inner.lock();
            match state.begin(Operation::Delete, key.kind, &key.name) {
                Some(Fault::Lost) => {
                    state.objects.remove(key);
                    Some(Fault::Lost)
                }
                Some(fault) => Some(fault),
                None => {
                    return match state.objects.remove(key) {
                        Some(_) => {
                            trace!(%key, "memory control plane: deleted");
                            Ok(())
                        }
                        None => Err(ControlPlaneError::NotFound { key: key.clone() }),
                    };
                }
            }
        };
        resolve(fault, key.clone()).await
    }

    async fn labels(&self, key: &ResourceKey) -> Result<Option<Labels>, ControlPlaneError> {
        let fault = {
            let mut state = self.inner.lock();
            match state.begin(Operation::Get, key.kind, &key.name) {
                Some(fault) => Some(fault),
                None => return Ok(state.objects.get(key).map(|obj| obj.labels().clone())),
            }
        };
        resolve(fault, key.clone()).await.map(|()| None)
    }

    async fn list(
        &self,
        kind: ResourceKind,
        namespace: &str,
        selector: &Labels,
    ) -> Result<Vec<ListedResource>, ControlPlaneError> {
        let fault = {
            let mut state = self.inner.lock();
            match state.begin(Operation::List, kind, "") {
                Some(fault) => Some(fault),
                None => {
                    return Ok(state
                        .objects
                        .iter()
                        .filter(|(key, obj)| {
                            key.kind == kind
                                && key.namespace == namespace
                                && obj.labels().matches(selector)
                        })
                        .map(|(key, obj)| ListedResource {
                            key: key.clone(),
                            labels: obj.labels().clone(),
                        })
                        .collect());
                }
            }
        };
        let key = ResourceKey::new(kind, namespace, "");
        resolve(fault, key).await.map(|()| Vec::new())
    }
}

/// Turn an injected fault into the call's answer. Runs outside the state lock.
async fn resolve(fault: Option<Fault>, key: ResourceKey) -> Result<(), ControlPlaneError> {
    match fault.and_then(|f| f.into_error(key)) {
        Some(err) => Err(err),
        None => std::future::pending().await,
    }
}
