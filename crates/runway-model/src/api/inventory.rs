use serde::{Deserialize, Serialize};

use crate::ResourceKind;

/// One runner as observed on the control plane.
///
/// `id` is the raw `id` label value: objects created by hand may carry ids that are not
/// valid runner identities, and inventory still has to report them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunnerSummary {
    pub id: String,
    /// Members found, sorted.
    pub members: Vec<ResourceKind>,
    /// `true` when all three members exist.
    pub complete: bool,
}

/// Inventory of every runner bundle in the namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryResponse {
    pub runners: Vec<RunnerSummary>,
}
