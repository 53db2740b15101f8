use std::fmt;

use serde::{Deserialize, Serialize};

/// The three member kinds of a runner bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    /// The running container replica set.
    Workload,
    /// Cluster-internal address fronting the workload pods.
    Service,
    /// Externally reachable hostname rule forwarding to the service.
    Route,
}

impl ResourceKind {
    /// All kinds, in a stable order.
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Workload,
        ResourceKind::Service,
        ResourceKind::Route,
    ];

    /// Returns the kind as a static string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Workload => "workload",
            ResourceKind::Service => "service",
            ResourceKind::Route => "route",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Address of a single control-plane object: `(kind, namespace, name)`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceKey {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
}

impl ResourceKey {
    pub fn new(kind: ResourceKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_as_str() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn key_display_is_kind_namespace_name() {
        let key = ResourceKey::new(ResourceKind::Route, "runners", "abc");
        assert_eq!(key.to_string(), "route/runners/abc");
    }
}
