//! Pure conversions from bundle member specs to Kubernetes objects.
mod route;
mod service;
mod workload;

pub use route::to_ingress;
pub use service::to_service;
pub use workload::to_deployment;

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use runway_model::{Annotations, Labels};

fn object_meta(name: &str, namespace: &str, labels: &Labels) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        labels: Some(labels.clone().into_inner()),
        ..Default::default()
    }
}

fn annotations(a: &Annotations) -> Option<BTreeMap<String, String>> {
    (!a.is_empty()).then(|| a.clone().into_inner())
}
