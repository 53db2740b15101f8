use serde::{Deserialize, Serialize};

use crate::{
    MAX_RUNNER_ID_LEN, RUNNER_PORT, ResourceLimits, RunnerId, TlsPolicy,
    domain::is_resource_name,
    error::{ModelError, ModelResult},
};

/// Longest hostname the DNS allows.
const MAX_HOSTNAME_LEN: usize = 253;

/// Static configuration every runner bundle is built from.
///
/// Loaded once at start-up, validated with [`ProvisioningPolicy::validate`] and then shared
/// read-only for the lifetime of the process. Per-request code never sees an invalid policy.
///
/// The defaults reproduce the reference deployment: namespace `runners`, the code-server
/// image behind gVisor, small limits, nginx ingress under `run.it.kr`, no TLS.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningPolicy {
    /// Namespace every bundle is created in.
    pub namespace: String,
    /// Container image reference.
    pub image: String,
    /// Name of the runner container.
    pub container_name: String,
    /// Fixed startup arguments of the container.
    pub args: Vec<String>,
    /// Isolation / runtime class; `None` (or `""` in a config file) uses the cluster default.
    pub runtime_class: Option<String>,
    /// Resource ceilings; empty means unlimited.
    pub limits: ResourceLimits,
    /// Ingress class name of every route.
    pub ingress_class: String,
    /// TLS issuance; `None` serves plain HTTP.
    pub tls: Option<TlsPolicy>,
    /// Suffix appended to the runner id to form the public hostname.
    pub base_domain: String,
    /// Port the container listens on and the service exposes.
    pub port: u16,
}

impl Default for ProvisioningPolicy {
    fn default() -> Self {
        Self {
            namespace: "runners".to_string(),
            image: "ghcr.io/coder/code-server:latest".to_string(),
            container_name: "codeserver".to_string(),
            args: vec!["--auth=none".to_string(), "--disable-telemetry".to_string()],
            runtime_class: Some("gvisor".to_string()),
            limits: ResourceLimits {
                cpu: Some("100m".to_string()),
                memory: Some("100Mi".to_string()),
                ephemeral_storage: Some("10Gi".to_string()),
            },
            ingress_class: "nginx".to_string(),
            tls: None,
            base_domain: "run.it.kr".to_string(),
            port: RUNNER_PORT,
        }
    }
}

impl ProvisioningPolicy {
    /// Public hostname of the given runner: `<id>.<base_domain>`.
    pub fn hostname_for(&self, id: &RunnerId) -> String {
        format!("{}.{}", id, self.base_domain)
    }

    /// Effective runtime class, treating an empty string as unset.
    pub fn runtime_class(&self) -> Option<&str> {
        self.runtime_class
            .as_deref()
            .map(str::trim)
            .filter(|class| !class.is_empty())
    }

    /// Returns `true` if routes get a TLS entry.
    pub fn tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Reject any policy that could make a per-request build produce an invalid resource.
    pub fn validate(&self) -> ModelResult<()> {
        if !is_resource_name(&self.namespace) {
            return Err(invalid(format!(
                "namespace '{}' is not a valid resource name",
                self.namespace
            )));
        }
        if self.image.trim().is_empty() {
            return Err(invalid("image cannot be empty"));
        }
        if !is_resource_name(&self.container_name) {
            return Err(invalid(format!(
                "container_name '{}' is not a valid resource name",
                self.container_name
            )));
        }
        self.limits.validate()?;
        if self.ingress_class.trim().is_empty() {
            return Err(invalid("ingress_class cannot be empty"));
        }
        if let Some(tls) = &self.tls {
            if tls.cluster_issuer.trim().is_empty() {
                return Err(invalid("tls.cluster_issuer cannot be empty"));
            }
            if tls.annotation.trim().is_empty() {
                return Err(invalid("tls.annotation cannot be empty"));
            }
        }
        validate_base_domain(&self.base_domain)?;
        if self.port == 0 {
            return Err(invalid("port cannot be zero"));
        }
        Ok(())
    }
}

/// Every dot-separated part must be a resource name, and the longest possible runner id
/// plus the separator must still fit in a hostname.
fn validate_base_domain(domain: &str) -> ModelResult<()> {
    if domain.is_empty() || !domain.split('.').all(is_resource_name) {
        return Err(invalid(format!("base_domain '{domain}' is not a valid domain")));
    }
    if MAX_RUNNER_ID_LEN + 1 + domain.len() > MAX_HOSTNAME_LEN {
        return Err(invalid(format!(
            "base_domain '{domain}' is too long for a {MAX_RUNNER_ID_LEN}-char runner id"
        )));
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> ModelError {
    ModelError::InvalidPolicy(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid_and_matches_reference_deployment() {
        let policy = ProvisioningPolicy::default();
        policy.validate().unwrap();

        assert_eq!(policy.namespace, "runners");
        assert_eq!(policy.port, 8080);
        assert_eq!(policy.runtime_class.as_deref(), Some("gvisor"));
        assert_eq!(policy.args, vec!["--auth=none", "--disable-telemetry"]);
        assert!(!policy.tls_enabled());
    }

    #[test]
    fn hostname_prefixes_base_domain_with_id() {
        let policy = ProvisioningPolicy::default();
        let id: RunnerId = "abcdefghij".parse().unwrap();
        assert_eq!(policy.hostname_for(&id), "abcdefghij.run.it.kr");
    }

    #[test]
    fn rejects_bad_namespace_and_domain() {
        let bad_ns = ProvisioningPolicy {
            namespace: "Runners".into(),
            ..Default::default()
        };
        assert!(matches!(bad_ns.validate(), Err(ModelError::InvalidPolicy(_))));

        for domain in ["", "run..it", "run.it.kr.", "-run.it", "run_it.kr"] {
            let policy = ProvisioningPolicy {
                base_domain: domain.into(),
                ..Default::default()
            };
            assert!(policy.validate().is_err(), "expected {domain:?} to be rejected");
        }
    }

    #[test]
    fn rejects_domain_leaving_no_room_for_id() {
        let label = "a".repeat(60);
        let domain = [label.as_str(); 4].join(".");
        let policy = ProvisioningPolicy {
            base_domain: domain,
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn rejects_empty_tls_issuer_and_zero_port() {
        let tls = ProvisioningPolicy {
            tls: Some(TlsPolicy::new(" ")),
            ..Default::default()
        };
        assert!(tls.validate().is_err());

        let port = ProvisioningPolicy {
            port: 0,
            ..Default::default()
        };
        assert!(port.validate().is_err());
    }

    #[test]
    fn empty_runtime_class_disables_isolation() {
        let policy: ProvisioningPolicy = toml::from_str(r#"runtime_class = """#).unwrap();
        policy.validate().unwrap();
        assert_eq!(policy.runtime_class(), None);

        assert_eq!(ProvisioningPolicy::default().runtime_class(), Some("gvisor"));
    }

    #[test]
    fn rejects_malformed_limits() {
        let policy = ProvisioningPolicy {
            limits: ResourceLimits {
                cpu: Some("a lot".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(ModelError::InvalidQuantity { field: "cpu", .. })
        ));
    }

    #[test]
    fn toml_partial_overrides_keep_defaults() {
        let raw = r#"
            namespace = "sandbox"
            base_domain = "dev.example.com"
            runtime_class = "kata"

            [limits]
            cpu = "500m"

            [tls]
            cluster_issuer = "letsencrypt"
        "#;
        let policy: ProvisioningPolicy = toml::from_str(raw).unwrap();
        policy.validate().unwrap();

        assert_eq!(policy.namespace, "sandbox");
        assert_eq!(policy.image, "ghcr.io/coder/code-server:latest");
        assert_eq!(policy.runtime_class.as_deref(), Some("kata"));
        assert_eq!(policy.limits.cpu.as_deref(), Some("500m"));
        assert_eq!(policy.limits.memory, None);

        let tls = policy.tls.expect("tls table must parse");
        assert_eq!(tls.cluster_issuer, "letsencrypt");
        assert_eq!(tls.annotation, "cert-manager.io/cluster-issuer");
    }
}
