pub mod applier;
pub mod builder;
pub mod control;
pub mod error;
pub mod identity;
pub mod inventory;
pub mod metrics;
pub mod provisioner;

pub use applier::{ApplyFailure, ApplyOutcome, BundleApplier, BundleState, OrphanedResource};
pub use builder::build_bundle;
pub use control::{ControlPlane, ControlPlaneError, ListedResource};
pub use error::ProvisionError;
pub use identity::{IdSource, IdentityError, IdentityGenerator};
pub use metrics::{MetricsBackend, MetricsHandle, NoOpMetrics, ProvisionOutcome, noop_metrics};
pub use provisioner::{Provisioner, TimeoutConfig};

pub mod prelude {
    pub use crate::control::{ControlPlane, ControlPlaneError};
    pub use crate::error::ProvisionError;
    pub use crate::provisioner::Provisioner;
}
