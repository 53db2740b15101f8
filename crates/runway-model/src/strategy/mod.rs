mod identity;
pub use identity::{IdentityPolicy, IdentityStrategy};
