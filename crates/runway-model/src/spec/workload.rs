use serde::{Deserialize, Serialize};

use crate::{Labels, ResourceLimits, RunnerId};

/// Declarative description of the runner workload (one replica of one container).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSpec {
    /// Object name; always the runner id.
    pub name: RunnerId,
    pub namespace: String,
    /// Labels on the workload object itself.
    pub labels: Labels,
    /// Selector the workload uses to own its pods.
    pub selector: Labels,
    /// Labels stamped on every pod; the service selects on these.
    pub pod_labels: Labels,
    pub replicas: i32,
    /// Isolation / runtime class (e.g. `gvisor`); `None` uses the cluster default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_class: Option<String>,
    pub container: ContainerSpec,
}

/// The single container of a runner pod.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Name of the listening port.
    pub port_name: String,
    /// Port the container listens on.
    pub port: u16,
    #[serde(default, skip_serializing_if = "ResourceLimits::is_empty")]
    pub limits: ResourceLimits,
}
