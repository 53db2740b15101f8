use std::fmt::Debug;

use async_trait::async_trait;
use k8s_openapi::NamespaceResourceScope;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::{Api, DeleteParams, ListParams, PostParams};
use kube::config::{Config, KubeConfigOptions};
use kube::{Client, Resource};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use runway_core::{ControlPlane, ControlPlaneError, ListedResource};
use runway_model::{BundleMember, Labels, ResourceKey, ResourceKind};

use crate::convert::{to_deployment, to_ingress, to_service};
use crate::error::KubeError;
use crate::status::map_error;

/// [`ControlPlane`] backed by the Kubernetes API.
///
/// Creates use `POST`, so a name clash surfaces as 409 and maps to
/// [`ControlPlaneError::AlreadyExists`]. Deletes propagate in the background.
#[derive(Clone)]
pub struct KubeControlPlane {
    client: Client,
}

impl KubeControlPlane {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Client from the in-cluster service account, or the local kubeconfig.
    pub async fn try_default() -> Result<Self, KubeError> {
        let client = Client::try_default().await?;
        info!("kubernetes client ready (inferred configuration)");
        Ok(Self::new(client))
    }

    /// Client for a named kubeconfig context.
    pub async fn from_context(context: &str) -> Result<Self, KubeError> {
        let options = KubeConfigOptions {
            context: Some(context.to_string()),
            ..Default::default()
        };
        let config = Config::from_kubeconfig(&options)
            .await
            .map_err(|e| KubeError::Config(e.to_string()))?;
        let client = Client::try_from(config)?;
        info!(context, "kubernetes client ready");
        Ok(Self::new(client))
    }

    fn api<K>(&self, namespace: &str) -> Api<K>
    where
        K: Resource<Scope = NamespaceResourceScope>,
        <K as Resource>::DynamicType: Default,
    {
        Api::namespaced(self.client.clone(), namespace)
    }

    async fn create_object<K>(&self, key: ResourceKey, object: K) -> Result<(), ControlPlaneError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + Debug + Serialize + DeserializeOwned,
        <K as Resource>::DynamicType: Default,
    {
        self.api::<K>(&key.namespace)
            .create(&PostParams::default(), &object)
            .await
            .map(|_| debug!(%key, "object created"))
            .map_err(|e| map_error(e, key))
    }

    async fn delete_object<K>(&self, key: &ResourceKey) -> Result<(), ControlPlaneError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + Debug + DeserializeOwned,
        <K as Resource>::DynamicType: Default,
    {
        self.api::<K>(&key.namespace)
            .delete(&key.name, &DeleteParams::background())
            .await
            .map(|_| debug!(%key, "object deleted"))
            .map_err(|e| map_error(e, key.clone()))
    }

    async fn object_labels<K>(&self, key: &ResourceKey) -> Result<Option<Labels>, ControlPlaneError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + Debug + DeserializeOwned,
        <K as Resource>::DynamicType: Default,
    {
        self.api::<K>(&key.namespace)
            .get_opt(&key.name)
            .await
            .map(|found| found.map(|obj| Labels::from(obj.meta().labels.clone().unwrap_or_default())))
            .map_err(|e| map_error(e, key.clone()))
    }

    async fn list_objects<K>(
        &self,
        kind: ResourceKind,
        namespace: &str,
        selector: &Labels,
    ) -> Result<Vec<ListedResource>, ControlPlaneError>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + Debug + DeserializeOwned,
        <K as Resource>::DynamicType: Default,
    {
        let params = ListParams::default().labels(&selector.to_selector());
        let list = self
            .api::<K>(namespace)
            .list(&params)
            .await
            .map_err(|e| map_error(e, ResourceKey::new(kind, namespace, "")))?;

        Ok(list
            .items
            .into_iter()
            .map(|obj| {
                let meta = obj.meta();
                ListedResource {
                    key: ResourceKey::new(kind, namespace, meta.name.clone().unwrap_or_default()),
                    labels: Labels::from(meta.labels.clone().unwrap_or_default()),
                }
            })
            .collect())
    }
}

#[async_trait]
impl ControlPlane for KubeControlPlane {
    fn name(&self) -> &'static str {
        "kubernetes"
    }

    async fn create(&self, member: BundleMember<'_>) -> Result<(), ControlPlaneError> {
        let key = member.key();
        match member {
            BundleMember::Route(r) => self.create_object(key, to_ingress(r)).await,
            BundleMember::Service(s) => self.create_object(key, to_service(s)).await,
            BundleMember::Workload(w) => self.create_object(key, to_deployment(w)).await,
        }
    }

    async fn delete(&self, key: &ResourceKey) -> Result<(), ControlPlaneError> {
        match key.kind {
            ResourceKind::Route => self.delete_object::<Ingress>(key).await,
            ResourceKind::Service => self.delete_object::<Service>(key).await,
            ResourceKind::Workload => self.delete_object::<Deployment>(key).await,
        }
    }

    async fn labels(&self, key: &ResourceKey) -> Result<Option<Labels>, ControlPlaneError> {
        match key.kind {
            ResourceKind::Route => self.object_labels::<Ingress>(key).await,
            ResourceKind::Service => self.object_labels::<Service>(key).await,
            ResourceKind::Workload => self.object_labels::<Deployment>(key).await,
        }
    }

    async fn list(
        &self,
        kind: ResourceKind,
        namespace: &str,
        selector: &Labels,
    ) -> Result<Vec<ListedResource>, ControlPlaneError> {
        match kind {
            ResourceKind::Route => self.list_objects::<Ingress>(kind, namespace, selector).await,
            ResourceKind::Service => self.list_objects::<Service>(kind, namespace, selector).await,
            ResourceKind::Workload => {
                self.list_objects::<Deployment>(kind, namespace, selector).await
            }
        }
    }
}
