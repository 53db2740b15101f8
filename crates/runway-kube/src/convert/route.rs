use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, IngressTLS, ServiceBackendPort,
};
use runway_model::RouteSpec;

use super::{annotations, object_meta};

/// Single-host ingress forwarding `path` to the runner service.
pub fn to_ingress(spec: &RouteSpec) -> Ingress {
    let mut metadata = object_meta(spec.name.as_str(), &spec.namespace, &spec.labels);
    metadata.annotations = annotations(&spec.annotations);

    let backend = IngressBackend {
        service: Some(IngressServiceBackend {
            name: spec.backend.service.to_string(),
            port: Some(ServiceBackendPort {
                number: Some(i32::from(spec.backend.port)),
                ..Default::default()
            }),
        }),
        ..Default::default()
    };

    Ingress {
        metadata,
        spec: Some(IngressSpec {
            ingress_class_name: Some(spec.ingress_class.clone()),
            rules: Some(vec![IngressRule {
                host: Some(spec.host.clone()),
                http: Some(HTTPIngressRuleValue {
                    paths: vec![HTTPIngressPath {
                        path: Some(spec.path.clone()),
                        path_type: spec.path_type.as_str().to_string(),
                        backend,
                    }],
                }),
            }]),
            tls: spec.tls.as_ref().map(|tls| {
                vec![IngressTLS {
                    hosts: Some(tls.hosts.clone()),
                    secret_name: Some(tls.secret_name.clone()),
                }]
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
