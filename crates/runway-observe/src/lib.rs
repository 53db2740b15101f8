//! Logging setup shared by runway binaries.
mod logger;
pub use logger::*;
