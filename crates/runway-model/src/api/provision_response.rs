use serde::{Deserialize, Serialize};

use crate::RunnerId;

/// Body returned by a successful provisioning call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionResponse {
    pub success: bool,
    pub runner_id: RunnerId,
}

impl ProvisionResponse {
    pub fn committed(runner_id: RunnerId) -> Self {
        Self {
            success: true,
            runner_id,
        }
    }
}
