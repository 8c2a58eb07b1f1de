//! Shared value types and the crate-wide error taxonomy.

/// Core value types (frame ranges, colors, formats, geometry re-exports).
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
