//! Mathematical utilities
//!
//! Rigid transform construction and comparison.

pub mod transform;

pub use transform::*;
