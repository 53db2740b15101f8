use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ProvisionError;
use runway_model::ModelError;

/// Time bounds of one provisioning request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound of every single control-plane call, rollback deletes included.
    pub call_timeout_ms: u64,
    /// Upper bound of the create sequence of one request.
    pub request_deadline_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: 10_000,
            request_deadline_ms: 30_000,
        }
    }
}

impl TimeoutConfig {
    #[inline]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    #[inline]
    pub fn request_deadline(&self) -> Duration {
        Duration::from_millis(self.request_deadline_ms)
    }

    pub fn validate(&self) -> Result<(), ProvisionError> {
        if self.call_timeout_ms == 0 {
            return Err(invalid("call_timeout_ms must be positive"));
        }
        if self.request_deadline_ms == 0 {
            return Err(invalid("request_deadline_ms must be positive"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> ProvisionError {
    ProvisionError::InvalidPolicy(ModelError::InvalidPolicy(msg.to_string()))
}
