//! Joint-space configurations

use std::fmt;

use nalgebra::DVector;

use super::{Joints, JointId, ModelError};
use crate::context::{ContextError, PhysicalContext};

/// A joint-space point: one scalar position per joint
///
/// Invariant: `joints.len() == positions.len()`.
#[derive(Clone, PartialEq)]
pub struct Configuration {
    joints: Joints,
    positions: DVector<f64>,
}

impl Configuration {
    /// Create a configuration, checking that every joint has a position
    pub fn new(joints: Joints, positions: DVector<f64>) -> Result<Self, ModelError> {
        if joints.len() != positions.len() {
            return Err(ModelError::JointCountMismatch {
                joints: joints.len(),
                positions: positions.len(),
            });
        }
        Ok(Self { joints, positions })
    }

    /// Create a configuration from a position slice
    pub fn from_slice(joints: Joints, positions: &[f64]) -> Result<Self, ModelError> {
        Self::new(joints, DVector::from_column_slice(positions))
    }

    /// Read the current configuration of `joints` from a context
    pub fn from_context<C>(joints: Joints, context: &C) -> Result<Self, ContextError>
    where
        C: PhysicalContext + ?Sized,
    {
        let positions = joints
            .iter()
            .map(|joint| context.joint_position(joint))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            positions: DVector::from_vec(positions),
            joints,
        })
    }

    pub fn joints(&self) -> &Joints {
        &self.joints
    }

    pub fn positions(&self) -> &DVector<f64> {
        &self.positions
    }

    /// Number of joints
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Whether both configurations are over the same joint sequence
    pub fn same_joints(&self, other: &Configuration) -> bool {
        same_joints(&self.joints, &other.joints)
    }

    /// Write every joint position into the context
    pub fn assign<C>(&self, context: &mut C) -> Result<(), ContextError>
    where
        C: PhysicalContext + ?Sized,
    {
        for (joint, &position) in self.joints.iter().zip(self.positions.iter()) {
            context.set_joint_position(joint, position)?;
        }
        Ok(())
    }

    /// Largest absolute per-joint difference, or `None` over different joints
    pub fn max_joint_distance(&self, other: &Configuration) -> Option<f64> {
        if !self.same_joints(other) {
            return None;
        }
        Some((&self.positions - &other.positions).amax())
    }
}

/// Whether two joint sequences are the same, by identity or by content
pub fn same_joints(a: &[JointId], b: &[JointId]) -> bool {
    std::ptr::eq(a, b) || a == b
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration({}: {:?})", self.joints.len(), self.positions.as_slice())
    }
}
