use k8s_openapi::api::core::v1::{Service, ServicePort as KubeServicePort, ServiceSpec as KubeServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use runway_model::ServiceSpec;

use super::object_meta;

/// ClusterIP service with the single runner port.
pub fn to_service(spec: &ServiceSpec) -> Service {
    Service {
        metadata: object_meta(spec.name.as_str(), &spec.namespace, &spec.labels),
        spec: Some(KubeServiceSpec {
            type_: Some("ClusterIP".to_string()),
            selector: Some(spec.selector.clone().into_inner()),
            ports: Some(vec![KubeServicePort {
                name: Some(spec.port.name.clone()),
                port: i32::from(spec.port.port),
                target_port: Some(IntOrString::Int(i32::from(spec.port.target_port))),
                protocol: Some(spec.port.protocol.as_str().to_string()),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}
