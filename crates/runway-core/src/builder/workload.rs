use runway_model::{
    ContainerSpec, Labels, PORT_NAME_HTTP, ProvisioningPolicy, RunnerId, WorkloadSpec,
};

pub fn to_workload_spec(id: &RunnerId, labels: &Labels, p: &ProvisioningPolicy) -> WorkloadSpec {
    WorkloadSpec {
        name: id.clone(),
        namespace: p.namespace.clone(),
        labels: labels.clone(),
        selector: labels.clone(),
        pod_labels: labels.clone(),
        replicas: 1,
        runtime_class: p.runtime_class().map(str::to_string),
        container: ContainerSpec {
            name: p.container_name.clone(),
            image: p.image.clone(),
            args: p.args.clone(),
            port_name: PORT_NAME_HTTP.to_string(),
            port: p.port,
            limits: p.limits.clone(),
        },
    }
}
