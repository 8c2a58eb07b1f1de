//! Supervised background rendering in an external 3D host process.

/// Per-frame background render supervision.
pub mod frame;
