use serde::{Deserialize, Serialize};

use crate::TLS_ISSUER_ANNOTATION;

/// TLS issuance for runner routes.
///
/// When present, every route is annotated for the certificate controller and carries a
/// TLS entry for its own hostname.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsPolicy {
    /// Name of the cluster issuer the certificate controller should use.
    pub cluster_issuer: String,
    /// Annotation key the certificate controller watches.
    #[serde(default = "default_annotation")]
    pub annotation: String,
}

impl TlsPolicy {
    pub fn new(cluster_issuer: impl Into<String>) -> Self {
        Self {
            cluster_issuer: cluster_issuer.into(),
            annotation: default_annotation(),
        }
    }
}

fn default_annotation() -> String {
    TLS_ISSUER_ANNOTATION.to_string()
}
