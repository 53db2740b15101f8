mod domain;
pub use domain::{APP_RUNNER, LABEL_APP, LABEL_CLAIM, LABEL_ID, PORT_NAME_HTTP, RUNNER_PORT, TLS_ISSUER_ANNOTATION};
pub use domain::{Annotations, Labels, MAX_RUNNER_ID_LEN, RunnerId, is_dns_label, is_resource_name};

mod error;
pub use error::{ModelError, ModelResult};

mod kind;
pub use kind::{ResourceKey, ResourceKind};

mod spec;
pub use spec::{
    BundleMember, ContainerSpec, PathType, Protocol, ResourceLimits, RouteBackend, RouteSpec,
    RouteTls, RunnerBundle, ServicePort, ServiceSpec, WorkloadSpec,
};

mod policy;
pub use policy::{ProvisioningPolicy, TlsPolicy};

mod strategy;
pub use strategy::{IdentityPolicy, IdentityStrategy};

mod api;
pub use api::{InventoryResponse, ProvisionResponse, RunnerSummary};
