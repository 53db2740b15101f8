use runway_model::{
    Labels, PORT_NAME_HTTP, Protocol, ProvisioningPolicy, RunnerId, ServicePort, ServiceSpec,
};

/// `pod_labels` must be the workload's pod labels; they become the selector verbatim.
pub fn to_service_spec(id: &RunnerId, pod_labels: &Labels, p: &ProvisioningPolicy) -> ServiceSpec {
    ServiceSpec {
        name: id.clone(),
        namespace: p.namespace.clone(),
        labels: pod_labels.clone(),
        selector: pod_labels.clone(),
        port: ServicePort {
            name: PORT_NAME_HTTP.to_string(),
            port: p.port,
            target_port: p.port,
            protocol: Protocol::Tcp,
        },
    }
}
