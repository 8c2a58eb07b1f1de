//! Hardware-controller input merged into shared state.

/// Per-tick message draining and last-write-wins state merging.
pub mod merger;
