//! Shared value types, hashing and the crate error type.

/// Geometry and 64-bit value helpers.
pub mod core;
/// Error type and result alias.
pub mod error;
pub(crate) mod math;
