//! Shared value types for relbin.
//!
//! Everything here is plain data: validated release tags, repository names
//! and the platform a release archive is built for. No I/O happens in this
//! crate.

pub mod platform;
pub mod types;

// Re-exports
pub use platform::*;
pub use types::*;
