//! Configuration, pose, and trajectory value types
//!
//! Immutable values produced by the stream generators and the interpolation
//! engine and consumed by postprocessing and playback:
//!
//! - [`Configuration`]: a joint-space point
//! - [`RelativePose`]: a child body pose expressed relative to a parent frame,
//!   evaluated lazily against a physical context
//! - [`Trajectory`]: an ordered path of waypoints plus attached bodies

pub mod configuration;
pub mod pose;
pub mod trajectory;

pub use configuration::*;
pub use pose::*;
pub use trajectory::*;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Model construction errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("Joint count mismatch: {joints} joints, {positions} positions")]
    JointCountMismatch { joints: usize, positions: usize },
    #[error("Configurations are over different joint sequences")]
    JointMismatch,
    #[error("Trajectory path must contain at least one waypoint")]
    EmptyPath,
    #[error("Resolution for joint {index} must be positive, got {value}")]
    NonPositiveResolution { index: usize, value: f64 },
    #[error("Interpolation needs {steps} steps, more than a path can hold")]
    TooManySteps { steps: f64 },
}

/// Joint identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JointId(String);

impl JointId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shared, ordered joint-identifier sequence
///
/// Configurations over the same joints share one allocation.
pub type Joints = Arc<[JointId]>;

/// Build a joint sequence from names
pub fn joint_ids<I, S>(names: I) -> Joints
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names.into_iter().map(JointId::new).collect()
}

/// Reference frame a relative pose is anchored to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameId {
    /// Fixed world frame
    World,
    /// Base frame of a named body
    Body(String),
}

impl FrameId {
    pub fn body(name: impl Into<String>) -> Self {
        FrameId::Body(name.into())
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameId::World => f.write_str("world"),
            FrameId::Body(name) => f.write_str(name),
        }
    }
}
