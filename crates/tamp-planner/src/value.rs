//! Values exchanged with the task planner
//!
//! Streams consume and produce these; the planner treats everything except
//! object names as opaque handles.

use std::fmt;

use tamp_core::{Configuration, RelativePose, Trajectory};

/// A stream argument or output
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Named object or surface
    Object(String),
    /// Placement of an object, anchored to the world frame
    Pose(RelativePose),
    /// Object pose relative to the gripper frame
    Grasp(RelativePose),
    /// Arm configuration
    Conf(Configuration),
    /// Arm trajectory
    Traj(Trajectory),
}

/// Value kind, for argument checking and error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Object,
    Pose,
    Grasp,
    Conf,
    Traj,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Object => "object",
            ValueKind::Pose => "pose",
            ValueKind::Grasp => "grasp",
            ValueKind::Conf => "conf",
            ValueKind::Traj => "traj",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn object(name: impl Into<String>) -> Self {
        Value::Object(name.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Object(_) => ValueKind::Object,
            Value::Pose(_) => ValueKind::Pose,
            Value::Grasp(_) => ValueKind::Grasp,
            Value::Conf(_) => ValueKind::Conf,
            Value::Traj(_) => ValueKind::Traj,
        }
    }

    pub fn as_object(&self) -> Option<&str> {
        match self {
            Value::Object(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_pose(&self) -> Option<&RelativePose> {
        match self {
            Value::Pose(pose) => Some(pose),
            _ => None,
        }
    }

    pub fn as_grasp(&self) -> Option<&RelativePose> {
        match self {
            Value::Grasp(grasp) => Some(grasp),
            _ => None,
        }
    }

    pub fn as_conf(&self) -> Option<&Configuration> {
        match self {
            Value::Conf(conf) => Some(conf),
            _ => None,
        }
    }

    pub fn as_traj(&self) -> Option<&Trajectory> {
        match self {
            Value::Traj(traj) => Some(traj),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Object(name) => f.write_str(name),
            Value::Pose(pose) => write!(f, "pose({})", pose.child()),
            Value::Grasp(grasp) => write!(f, "grasp({})", grasp.child()),
            Value::Conf(conf) => write!(f, "conf({})", conf.len()),
            Value::Traj(traj) => write!(f, "traj({})", traj.len()),
        }
    }
}

impl From<Configuration> for Value {
    fn from(conf: Configuration) -> Self {
        Value::Conf(conf)
    }
}

impl From<Trajectory> for Value {
    fn from(traj: Trajectory) -> Self {
        Value::Traj(traj)
    }
}
