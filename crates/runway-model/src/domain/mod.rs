mod labels;
pub use labels::Labels;

mod id;
pub use id::{MAX_RUNNER_ID_LEN, RunnerId, is_dns_label, is_resource_name};

mod constants;
pub use constants::{APP_RUNNER, LABEL_APP, LABEL_CLAIM, LABEL_ID, PORT_NAME_HTTP, RUNNER_PORT, TLS_ISSUER_ANNOTATION};

/// Free-form metadata attached to a resource but never used for selection.
///
/// Shares the representation of [`Labels`]; kept as a separate name so call sites
/// read as what they are.
pub type Annotations = Labels;
