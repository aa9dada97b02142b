//! qrun version information.
//!
//! Exposes the crate version as a single constant so the CLI and any generated
//! file headers agree on the same value.

/// The qrun version string (for example, `0.1.0`).
pub const QRUN_VERSION: &str = env!("CARGO_PKG_VERSION");
