mod provision_response;
pub use provision_response::ProvisionResponse;

mod inventory;
pub use inventory::{InventoryResponse, RunnerSummary};
