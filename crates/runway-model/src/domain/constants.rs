//! Common model-level constants.
//!
//! Well-known label keys, values and ports shared by every resource of a runner bundle.

/// Label key carrying the application marker of every runner resource.
pub const LABEL_APP: &str = "app";

/// Value of [`LABEL_APP`] for runner resources.
///
/// Listing by `app=runner` is how inventory finds every bundle in the namespace.
pub const APP_RUNNER: &str = "runner";

/// Label key carrying the runner identity.
pub const LABEL_ID: &str = "id";

/// Label key carrying the per-request claim stamped on every member of a bundle.
///
/// Two requests that draw the same runner id produce objects with equal `id` labels; the
/// claim tells them apart when rollback has to decide whether an object is its own.
pub const LABEL_CLAIM: &str = "runway.dev/claim";

/// Port the runner container listens on and the service exposes.
pub const RUNNER_PORT: u16 = 8080;

/// Name of the single service / container port.
pub const PORT_NAME_HTTP: &str = "http";

/// Annotation watched by cert-manager to issue a certificate for an ingress.
pub const TLS_ISSUER_ANNOTATION: &str = "cert-manager.io/cluster-issuer";
