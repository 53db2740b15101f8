use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, PodSpec, PodTemplateSpec, ResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use runway_model::{ContainerSpec, ResourceLimits, WorkloadSpec};

use super::object_meta;

pub fn to_deployment(spec: &WorkloadSpec) -> Deployment {
    Deployment {
        metadata: object_meta(spec.name.as_str(), &spec.namespace, &spec.labels),
        spec: Some(DeploymentSpec {
            replicas: Some(spec.replicas),
            selector: LabelSelector {
                match_labels: Some(spec.selector.clone().into_inner()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(spec.pod_labels.clone().into_inner()),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    runtime_class_name: spec.runtime_class.clone(),
                    containers: vec![to_container(&spec.container)],
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn to_container(c: &ContainerSpec) -> Container {
    Container {
        name: c.name.clone(),
        image: Some(c.image.clone()),
        args: (!c.args.is_empty()).then(|| c.args.clone()),
        ports: Some(vec![ContainerPort {
            name: Some(c.port_name.clone()),
            container_port: i32::from(c.port),
            protocol: Some("TCP".to_string()),
            ..Default::default()
        }]),
        resources: to_resources(&c.limits),
        ..Default::default()
    }
}

fn to_resources(limits: &ResourceLimits) -> Option<ResourceRequirements> {
    if limits.is_empty() {
        return None;
    }
    let limits: BTreeMap<String, Quantity> = limits
        .iter()
        .map(|(name, value)| (name.to_string(), Quantity(value.to_string())))
        .collect();
    Some(ResourceRequirements {
        limits: Some(limits),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use runway_core::build_bundle;
    use runway_model::ProvisioningPolicy;

    fn deployment(policy: &ProvisioningPolicy) -> Deployment {
        let bundle = build_bundle(&"abcdefghij".parse().unwrap(), policy);
        to_deployment(&bundle.workload)
    }

    #[test]
    fn selector_matches_pod_labels() {
        let d = deployment(&ProvisioningPolicy::default());
        let spec = d.spec.unwrap();

        assert_eq!(spec.replicas, Some(1));
        assert_eq!(
            spec.selector.match_labels,
            spec.template.metadata.unwrap().labels
        );
        assert_eq!(d.metadata.name.as_deref(), Some("abcdefghij"));
        assert_eq!(d.metadata.namespace.as_deref(), Some("runners"));
    }

    #[test]
    fn container_carries_image_port_limits_and_runtime_class() {
        let d = deployment(&ProvisioningPolicy::default());
        let pod = d.spec.unwrap().template.spec.unwrap();
        assert_eq!(pod.runtime_class_name.as_deref(), Some("gvisor"));

        let c = &pod.containers[0];
        assert_eq!(c.name, "codeserver");
        assert_eq!(c.image.as_deref(), Some("ghcr.io/coder/code-server:latest"));
        assert_eq!(
            c.args,
            Some(vec!["--auth=none".to_string(), "--disable-telemetry".to_string()])
        );
        let port = &c.ports.as_ref().unwrap()[0];
        assert_eq!(port.container_port, 8080);
        assert_eq!(port.name.as_deref(), Some("http"));

        let limits = c.resources.as_ref().unwrap().limits.as_ref().unwrap();
        assert_eq!(limits["cpu"], Quantity("100m".into()));
        assert_eq!(limits["memory"], Quantity("100Mi".into()));
        assert_eq!(limits["ephemeral-storage"], Quantity("10Gi".into()));
    }

    #[test]
    fn no_isolation_and_no_limits() {
        let policy = ProvisioningPolicy {
            runtime_class: None,
            limits: ResourceLimits::default(),
            ..Default::default()
        };
        let pod = deployment(&policy).spec.unwrap().template.spec.unwrap();
        assert!(pod.runtime_class_name.is_none());
        assert!(pod.containers[0].resources.is_none());
    }

    #[test]
    fn serializes_as_apps_v1() {
        let json = serde_json::to_value(deployment(&ProvisioningPolicy::default())).unwrap();
        assert_eq!(json["apiVersion"], "apps/v1");
        assert_eq!(json["kind"], "Deployment");
        assert_eq!(json["metadata"]["labels"]["app"], "runner");
    }
}
