use serde::{Deserialize, Serialize};

use crate::{Labels, RunnerId};

/// Transport protocol of a service port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl Protocol {
    /// Returns the protocol as the control plane spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        }
    }
}

/// Cluster-internal service endpoint fronting the runner pods.
///
/// Never exposed outside the cluster directly; the route is the only public entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    /// Object name; always the runner id.
    pub name: RunnerId,
    pub namespace: String,
    pub labels: Labels,
    /// Must equal the workload's pod labels exactly.
    pub selector: Labels,
    pub port: ServicePort,
}

/// The single port of a runner service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    pub name: String,
    pub port: u16,
    pub target_port: u16,
    pub protocol: Protocol,
}
