//! # TAMP Core
//!
//! Value types and joint-space math shared by the task-and-motion bridge.
//!
//! ## Modules
//!
//! - [`math`]: Rigid transform helpers
//! - [`geometry`]: Bounding boxes and box-on-box placement sampling
//! - [`model`]: Configurations, relative poses, trajectories
//! - [`interpolation`]: Resolution-bounded joint-space interpolation
//! - [`context`]: Physical context boundary and an in-memory implementation
//! - [`kinematics`]: Inverse kinematics boundary

pub mod math;
pub mod geometry;
pub mod model;
pub mod interpolation;
pub mod context;
pub mod kinematics;

pub use context::{ContextError, PhysicalContext, WorldState};
pub use interpolation::{JointInterpolator, DEFAULT_RESOLUTION};
pub use kinematics::InverseKinematics;
pub use model::{
    joint_ids, Configuration, FrameId, JointId, Joints, ModelError, RelativePose, Trajectory,
    Waypoint,
};
