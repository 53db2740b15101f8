//! Pure translation of `(RunnerId, ProvisioningPolicy)` into a [`RunnerBundle`].
//!
//! No I/O and no error path: the policy is validated once at start-up.
mod route;
mod service;
mod workload;

pub use route::to_route_spec;
pub use service::to_service_spec;
pub use workload::to_workload_spec;

use runway_model::{Labels, ProvisioningPolicy, RunnerBundle, RunnerId};

/// Build the three bundle members for `id`.
///
/// A single label set is created here and cloned into every member, so the workload pod
/// labels, the workload selector and the service selector are equal by construction.
pub fn build_bundle(id: &RunnerId, policy: &ProvisioningPolicy) -> RunnerBundle {
    let labels = Labels::for_runner(id);

    let workload = to_workload_spec(id, &labels, policy);
    let service = to_service_spec(id, &workload.pod_labels, policy);
    let route = to_route_spec(id, &labels, &service, policy);

    RunnerBundle {
        id: id.clone(),
        workload,
        service,
        route,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runway_model::{
        APP_RUNNER, LABEL_APP, LABEL_ID, PathType, Protocol, ResourceKind, ResourceLimits,
        TLS_ISSUER_ANNOTATION, TlsPolicy,
    };

    fn id(s: &str) -> RunnerId {
        s.parse().unwrap()
    }

    fn tls_policy() -> ProvisioningPolicy {
        ProvisioningPolicy {
            tls: Some(TlsPolicy::new("letsencrypt-prod")),
            runtime_class: None,
            limits: ResourceLimits::default(),
            ..Default::default()
        }
    }

    #[test]
    fn members_share_name_and_labels() {
        let runner = id("abcdefghij");
        let bundle = build_bundle(&runner, &ProvisioningPolicy::default());

        let expected = {
            let mut l = Labels::new();
            l.insert(LABEL_APP, APP_RUNNER).insert(LABEL_ID, "abcdefghij");
            l
        };

        for member in bundle.members() {
            assert_eq!(member.name(), &runner, "{} name", member.kind());
            assert_eq!(member.namespace(), "runners", "{} namespace", member.kind());
        }
        assert_eq!(bundle.workload.labels, expected);
        assert_eq!(bundle.workload.pod_labels, expected);
        assert_eq!(bundle.service.labels, expected);
        assert_eq!(bundle.route.labels, expected);
    }

    #[test]
    fn service_selector_equals_workload_pod_labels() {
        let bundle = build_bundle(&id("xyz"), &ProvisioningPolicy::default());

        assert_eq!(bundle.service.selector, bundle.workload.pod_labels);
        assert_eq!(bundle.workload.selector, bundle.workload.pod_labels);
        assert!(bundle.workload.pod_labels.matches(&bundle.service.selector));
    }

    #[test]
    fn claim_marks_objects_but_not_selectors() {
        let mut bundle = build_bundle(&id("abc"), &ProvisioningPolicy::default());
        assert_eq!(bundle.claim(), None);

        bundle.stamp_claim("c0ffee");

        assert_eq!(bundle.claim(), Some("c0ffee"));
        assert_eq!(bundle.workload.labels, bundle.service.labels);
        assert_eq!(bundle.service.labels, bundle.route.labels);
        assert_eq!(bundle.workload.pod_labels, Labels::for_runner(&bundle.id));
        assert_eq!(bundle.service.selector, bundle.workload.pod_labels);
        assert!(bundle.workload.labels.matches(&bundle.workload.pod_labels));
    }

    #[test]
    fn route_backend_targets_service_name_and_port() {
        let bundle = build_bundle(&id("xyz"), &ProvisioningPolicy::default());

        assert_eq!(bundle.route.backend.service, bundle.service.name);
        assert_eq!(bundle.route.backend.port, bundle.service.port.port);
        assert_eq!(bundle.service.port.target_port, bundle.workload.container.port);
    }

    #[test]
    fn workload_follows_policy() {
        let bundle = build_bundle(&id("abc"), &ProvisioningPolicy::default());
        let w = &bundle.workload;

        assert_eq!(w.replicas, 1);
        assert_eq!(w.runtime_class.as_deref(), Some("gvisor"));
        assert_eq!(w.container.name, "codeserver");
        assert_eq!(w.container.image, "ghcr.io/coder/code-server:latest");
        assert_eq!(w.container.args, vec!["--auth=none", "--disable-telemetry"]);
        assert_eq!(w.container.port, 8080);
        assert_eq!(w.container.port_name, "http");
        assert_eq!(w.container.limits.cpu.as_deref(), Some("100m"));
        assert_eq!(w.container.limits.memory.as_deref(), Some("100Mi"));
        assert_eq!(w.container.limits.ephemeral_storage.as_deref(), Some("10Gi"));
    }

    #[test]
    fn service_is_single_tcp_http_port() {
        let bundle = build_bundle(&id("abc"), &ProvisioningPolicy::default());
        let port = &bundle.service.port;

        assert_eq!(port.name, "http");
        assert_eq!(port.port, 8080);
        assert_eq!(port.target_port, 8080);
        assert_eq!(port.protocol, Protocol::Tcp);
    }

    #[test]
    fn route_without_tls_is_plain_prefix_rule() {
        let bundle = build_bundle(&id("abc"), &ProvisioningPolicy::default());
        let r = &bundle.route;

        assert_eq!(r.host, "abc.run.it.kr");
        assert_eq!(bundle.hostname(), "abc.run.it.kr");
        assert_eq!(r.path, "/");
        assert_eq!(r.path_type, PathType::Prefix);
        assert_eq!(r.ingress_class, "nginx");
        assert!(r.tls.is_none());
        assert!(r.annotations.is_empty());
    }

    #[test]
    fn route_with_tls_annotates_and_lists_exactly_its_host() {
        let bundle = build_bundle(&id("abc"), &tls_policy());
        let r = &bundle.route;

        assert_eq!(
            r.annotations.get(TLS_ISSUER_ANNOTATION),
            Some("letsencrypt-prod")
        );
        let tls = r.tls.as_ref().expect("tls entry");
        assert_eq!(tls.hosts, vec!["abc.run.it.kr".to_string()]);
        assert_eq!(tls.secret_name, "abc-tls");
    }

    #[test]
    fn optional_isolation_and_limits_are_omitted() {
        let bundle = build_bundle(&id("abc"), &tls_policy());
        assert!(bundle.workload.runtime_class.is_none());
        assert!(bundle.workload.container.limits.is_empty());
    }

    #[test]
    fn build_is_deterministic() {
        let policy = tls_policy();
        assert_eq!(build_bundle(&id("abc"), &policy), build_bundle(&id("abc"), &policy));
    }

    #[test]
    fn members_are_ordered_route_service_workload() {
        let bundle = build_bundle(&id("abc"), &ProvisioningPolicy::default());
        let kinds: Vec<_> = bundle.members().iter().map(|m| m.kind()).collect();
        assert_eq!(
            kinds,
            vec![ResourceKind::Route, ResourceKind::Service, ResourceKind::Workload]
        );
    }
}
