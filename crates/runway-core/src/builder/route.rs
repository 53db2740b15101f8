use runway_model::{
    Annotations, Labels, PathType, ProvisioningPolicy, RouteBackend, RouteSpec, RouteTls,
    RunnerId, ServiceSpec,
};

pub fn to_route_spec(
    id: &RunnerId,
    labels: &Labels,
    service: &ServiceSpec,
    p: &ProvisioningPolicy,
) -> RouteSpec {
    let host = p.hostname_for(id);

    let mut annotations = Annotations::new();
    let tls = p.tls.as_ref().map(|tls| {
        annotations.insert(tls.annotation.as_str(), tls.cluster_issuer.as_str());
        RouteTls {
            hosts: vec![host.clone()],
            secret_name: format!("{id}-tls"),
        }
    });

    RouteSpec {
        name: id.clone(),
        namespace: p.namespace.clone(),
        labels: labels.clone(),
        annotations,
        ingress_class: p.ingress_class.clone(),
        host,
        path: "/".to_string(),
        path_type: PathType::Prefix,
        backend: RouteBackend {
            service: service.name.clone(),
            port: service.port.port,
        },
        tls,
    }
}
