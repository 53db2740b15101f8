use runway_model::{ModelError, ResourceKind, RunnerId};
use thiserror::Error;

use crate::applier::OrphanedResource;
use crate::control::ControlPlaneError;
use crate::identity::IdentityError;

/// Terminal failure of a provisioning request.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("invalid provisioning policy: {0}")]
    InvalidPolicy(#[from] ModelError),

    #[error("runner id generation exhausted after {attempts} attempts")]
    GenerationExhausted { attempts: u32 },

    #[error("runner {runner}: {stage} create failed: {cause}; bundle rolled back")]
    RolledBack {
        runner: RunnerId,
        stage: ResourceKind,
        cause: ControlPlaneError,
    },

    #[error(
        "runner {}: {} create failed: {}; {} resource(s) orphaned",
        .runner, .stage, .cause, .orphans.len()
    )]
    Orphaned {
        runner: RunnerId,
        stage: ResourceKind,
        cause: ControlPlaneError,
        orphans: Vec<OrphanedResource>,
    },

    #[error("inventory listing failed: {0}")]
    Inventory(#[source] ControlPlaneError),
}

impl From<IdentityError> for ProvisionError {
    fn from(e: IdentityError) -> Self {
        match e {
            IdentityError::Exhausted { attempts } => ProvisionError::GenerationExhausted { attempts },
        }
    }
}

impl ProvisionError {
    /// Control-plane error that ended the request, if any.
    pub fn cause(&self) -> Option<&ControlPlaneError> {
        match self {
            ProvisionError::RolledBack { cause, .. } | ProvisionError::Orphaned { cause, .. } => {
                Some(cause)
            }
            ProvisionError::Inventory(cause) => Some(cause),
            _ => None,
        }
    }

    /// Runner the request was working on, if an identity was generated.
    pub fn runner(&self) -> Option<&RunnerId> {
        match self {
            ProvisionError::RolledBack { runner, .. } | ProvisionError::Orphaned { runner, .. } => {
                Some(runner)
            }
            _ => None,
        }
    }

    /// `true` when a member name was already taken.
    pub fn is_collision(&self) -> bool {
        matches!(self.cause(), Some(ControlPlaneError::AlreadyExists { .. }))
    }

    /// `true` when the request ran out of time or was cancelled.
    pub fn is_deadline(&self) -> bool {
        self.cause().is_some_and(ControlPlaneError::is_indeterminate)
    }

    /// `true` when resources were left behind.
    pub fn is_orphaned(&self) -> bool {
        matches!(self, ProvisionError::Orphaned { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runway_model::ResourceKey;

    fn id() -> RunnerId {
        "abcdefghij".parse().unwrap()
    }

    #[test]
    fn exhaustion_converts_from_identity_error() {
        let err: ProvisionError = IdentityError::Exhausted { attempts: 8 }.into();
        assert!(matches!(err, ProvisionError::GenerationExhausted { attempts: 8 }));
        assert!(err.cause().is_none());
    }

    #[test]
    fn classifies_causes() {
        let key = ResourceKey::new(ResourceKind::Route, "runners", "abcdefghij");
        let collision = ProvisionError::RolledBack {
            runner: id(),
            stage: ResourceKind::Route,
            cause: ControlPlaneError::AlreadyExists { key: key.clone() },
        };
        assert!(collision.is_collision());
        assert!(!collision.is_deadline());
        assert_eq!(collision.runner(), Some(&id()));

        let cancelled = ProvisionError::RolledBack {
            runner: id(),
            stage: ResourceKind::Workload,
            cause: ControlPlaneError::Cancelled,
        };
        assert!(cancelled.is_deadline());

        let orphaned = ProvisionError::Orphaned {
            runner: id(),
            stage: ResourceKind::Workload,
            cause: ControlPlaneError::Transport("reset".into()),
            orphans: vec![OrphanedResource {
                key,
                cause: ControlPlaneError::Transport("reset".into()),
            }],
        };
        assert!(orphaned.is_orphaned());
        assert_eq!(
            orphaned.to_string(),
            "runner abcdefghij: workload create failed: control plane unreachable: reset; 1 resource(s) orphaned"
        );
    }
}
