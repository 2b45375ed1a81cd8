//! bsc_core: Core utilities for the bsc BrighterScript compiler.
//!
//! Provides source positions and ranges, and arena helpers
//! used throughout the compiler pipeline.

pub mod arena;
pub mod text;

// Re-export commonly used types
pub use arena::alloc_vec_in;
pub use text::{Position, Range};
