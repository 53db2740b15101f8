use thiserror::Error;

/// Failure to build the cluster client.
#[derive(Debug, Error)]
pub enum KubeError {
    #[error("cannot load cluster configuration: {0}")]
    Config(String),

    #[error("cannot create cluster client: {0}")]
    Client(#[from] kube::Error),
}
