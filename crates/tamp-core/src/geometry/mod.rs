//! Coarse geometry for placement and grasp reasoning
//!
//! Axis-aligned bounding boxes and box-on-box placement sampling.

pub mod aabb;
pub mod placement;

pub use aabb::*;
pub use placement::*;
