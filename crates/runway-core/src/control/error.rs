use std::time::Duration;

use runway_model::ResourceKey;
use thiserror::Error;

/// Outcome of a failed control-plane call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlPlaneError {
    #[error("{key} already exists")]
    AlreadyExists { key: ResourceKey },

    #[error("{key} not found")]
    NotFound { key: ResourceKey },

    #[error("{key} rejected: {reason}")]
    Rejected { key: ResourceKey, reason: String },

    #[error("control plane unreachable: {0}")]
    Transport(String),

    #[error("call timed out after {0:?}")]
    Timeout(Duration),

    #[error("call cancelled")]
    Cancelled,
}

impl ControlPlaneError {
    /// Error category label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ControlPlaneError::AlreadyExists { .. } => "already_exists",
            ControlPlaneError::NotFound { .. } => "not_found",
            ControlPlaneError::Rejected { .. } => "rejected",
            ControlPlaneError::Transport(_) => "transport",
            ControlPlaneError::Timeout(_) => "timeout",
            ControlPlaneError::Cancelled => "cancelled",
        }
    }

    /// `true` when the call was abandoned without an answer, so the object may or may not exist.
    ///
    /// An abandoned create may also have lost a name race, in which case the object that
    /// exists belongs to someone else. Rollback reads the object's claim label before
    /// deleting it.
    pub fn is_indeterminate(&self) -> bool {
        matches!(
            self,
            ControlPlaneError::Timeout(_) | ControlPlaneError::Cancelled
        )
    }
}
