//! In-memory physical context
//!
//! Stores joint positions and free-body poses. Frames rigidly driven by
//! joints (e.g. the gripper mounted on an arm) are registered as linked
//! frames whose pose is computed on demand by a forward-kinematics closure.

use std::collections::BTreeMap;
use std::fmt;

use nalgebra::{DVector, Isometry3};

use super::{ContextError, PhysicalContext};
use crate::model::{FrameId, JointId, Joints};

/// Forward kinematics of a linked frame: joint positions -> world pose
pub type ForwardKinematicsFn = Box<dyn Fn(&DVector<f64>) -> Isometry3<f64>>;

struct LinkedFrame {
    joints: Joints,
    forward_kinematics: ForwardKinematicsFn,
}

/// Joint and body state without dynamics
#[derive(Default)]
pub struct WorldState {
    joints: BTreeMap<JointId, f64>,
    bodies: BTreeMap<String, Isometry3<f64>>,
    linked_frames: BTreeMap<String, LinkedFrame>,
}

impl WorldState {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a joint with its initial position
    pub fn add_joint(&mut self, joint: JointId, position: f64) {
        self.joints.insert(joint, position);
    }

    /// Register every joint of a sequence with the matching position
    pub fn add_joints(&mut self, joints: &Joints, positions: &DVector<f64>) {
        for (joint, &position) in joints.iter().zip(positions.iter()) {
            self.add_joint(joint.clone(), position);
        }
    }

    /// Register a free body with its initial world pose
    pub fn add_body(&mut self, name: impl Into<String>, pose: Isometry3<f64>) {
        self.bodies.insert(name.into(), pose);
    }

    /// Register a frame whose pose follows `joints` through `forward_kinematics`
    pub fn link_frame(
        &mut self,
        name: impl Into<String>,
        joints: Joints,
        forward_kinematics: impl Fn(&DVector<f64>) -> Isometry3<f64> + 'static,
    ) {
        self.linked_frames.insert(
            name.into(),
            LinkedFrame {
                joints,
                forward_kinematics: Box::new(forward_kinematics),
            },
        );
    }

    /// Positions of a joint sequence, in order
    pub fn positions(&self, joints: &[JointId]) -> Result<DVector<f64>, ContextError> {
        let values = joints
            .iter()
            .map(|joint| self.joint_position(joint))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DVector::from_vec(values))
    }

    /// Names of all free bodies
    pub fn bodies(&self) -> impl Iterator<Item = &str> {
        self.bodies.keys().map(String::as_str)
    }
}

impl PhysicalContext for WorldState {
    fn joint_position(&self, joint: &JointId) -> Result<f64, ContextError> {
        self.joints
            .get(joint)
            .copied()
            .ok_or_else(|| ContextError::UnknownJoint(joint.clone()))
    }

    fn set_joint_position(&mut self, joint: &JointId, position: f64) -> Result<(), ContextError> {
        match self.joints.get_mut(joint) {
            Some(value) => {
                *value = position;
                Ok(())
            }
            None => Err(ContextError::UnknownJoint(joint.clone())),
        }
    }

    fn frame_pose(&self, frame: &FrameId) -> Result<Isometry3<f64>, ContextError> {
        match frame {
            FrameId::World => Ok(Isometry3::identity()),
            FrameId::Body(name) => {
                if let Some(linked) = self.linked_frames.get(name) {
                    let positions = self.positions(&linked.joints)?;
                    return Ok((linked.forward_kinematics)(&positions));
                }
                self.bodies
                    .get(name)
                    .copied()
                    .ok_or_else(|| ContextError::UnknownFrame(frame.clone()))
            }
        }
    }

    fn set_body_pose(&mut self, body: &str, pose: Isometry3<f64>) -> Result<(), ContextError> {
        match self.bodies.get_mut(body) {
            Some(current) => {
                *current = pose;
                Ok(())
            }
            None => Err(ContextError::UnknownBody(body.to_string())),
        }
    }
}

impl fmt::Debug for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorldState")
            .field("joints", &self.joints)
            .field("bodies", &self.bodies)
            .field("linked_frames", &self.linked_frames.keys().collect::<Vec<_>>())
            .finish()
    }
}
