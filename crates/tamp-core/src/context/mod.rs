//! Physical context boundary
//!
//! The physical context is the external simulation/physics state that
//! configurations and relative poses are assigned into. Only two mutation
//! points exist: joint positions and free-body world poses.

pub mod world;

pub use world::*;

use nalgebra::Isometry3;
use thiserror::Error;

use crate::model::{FrameId, JointId};

/// Errors raised by a physical context
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContextError {
    #[error("Unknown joint: {0}")]
    UnknownJoint(JointId),
    #[error("Unknown frame: {0}")]
    UnknownFrame(FrameId),
    #[error("Unknown body: {0}")]
    UnknownBody(String),
}

/// Mutable physical state shared by assignment and playback
///
/// Only one trajectory may assign into a context at a time; callers pass it
/// by `&mut` through playback.
pub trait PhysicalContext {
    /// Current position of a joint
    fn joint_position(&self, joint: &JointId) -> Result<f64, ContextError>;

    /// Write a joint position
    fn set_joint_position(&mut self, joint: &JointId, position: f64) -> Result<(), ContextError>;

    /// Current world pose of a frame
    fn frame_pose(&self, frame: &FrameId) -> Result<Isometry3<f64>, ContextError>;

    /// Write the world pose of a free body
    fn set_body_pose(&mut self, body: &str, pose: Isometry3<f64>) -> Result<(), ContextError>;
}
