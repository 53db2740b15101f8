mod resource;
pub use resource::{ResourceKey, ResourceKind};
