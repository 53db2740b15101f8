use serde::{Deserialize, Serialize};

use crate::{Annotations, Labels, RunnerId};

/// How a route path is matched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathType {
    #[default]
    Prefix,
    Exact,
}

impl PathType {
    /// Returns the path type as the control plane spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            PathType::Prefix => "Prefix",
            PathType::Exact => "Exact",
        }
    }
}

/// Externally routable hostname rule for one runner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    /// Object name; always the runner id.
    pub name: RunnerId,
    pub namespace: String,
    pub labels: Labels,
    #[serde(default, skip_serializing_if = "Labels::is_empty")]
    pub annotations: Annotations,
    pub ingress_class: String,
    /// Public hostname, `<id>.<base-domain>`.
    pub host: String,
    pub path: String,
    pub path_type: PathType,
    pub backend: RouteBackend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<RouteTls>,
}

/// Service the route forwards to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteBackend {
    pub service: RunnerId,
    pub port: u16,
}

/// TLS termination entry of a route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTls {
    pub hosts: Vec<String>,
    /// Secret the certificate controller writes the issued certificate into.
    pub secret_name: String,
}
