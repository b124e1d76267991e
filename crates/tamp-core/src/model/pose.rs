//! Lazily evaluated relative poses

use nalgebra::Isometry3;

use super::FrameId;
use crate::context::{ContextError, PhysicalContext};

/// Pose of a child body relative to a parent frame
///
/// world_pose(child) = world_pose(parent) ∘ transform
///
/// The composition happens at assignment time against the current context,
/// so a grasp (parent = gripper frame) keeps the held body rigid relative to
/// the gripper wherever the arm is.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativePose {
    parent: FrameId,
    child: String,
    transform: Isometry3<f64>,
}

impl RelativePose {
    pub fn new(parent: FrameId, child: impl Into<String>, transform: Isometry3<f64>) -> Self {
        Self {
            parent,
            child: child.into(),
            transform,
        }
    }

    /// Pose anchored to the world frame
    pub fn in_world(child: impl Into<String>, transform: Isometry3<f64>) -> Self {
        Self::new(FrameId::World, child, transform)
    }

    pub fn parent(&self) -> &FrameId {
        &self.parent
    }

    pub fn child(&self) -> &str {
        &self.child
    }

    pub fn transform(&self) -> &Isometry3<f64> {
        &self.transform
    }

    /// World pose of the child given the parent's current pose in `context`
    pub fn evaluate<C>(&self, context: &C) -> Result<Isometry3<f64>, ContextError>
    where
        C: PhysicalContext + ?Sized,
    {
        let parent_pose = context.frame_pose(&self.parent)?;
        Ok(parent_pose * self.transform)
    }

    /// Compose with the parent's current pose and write the child's world pose
    pub fn assign<C>(&self, context: &mut C) -> Result<(), ContextError>
    where
        C: PhysicalContext + ?Sized,
    {
        let child_pose = self.evaluate(context)?;
        context.set_body_pose(&self.child, child_pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::WorldState;
    use crate::model::joint_ids;
    use approx::assert_relative_eq;
    use nalgebra::DVector;

    #[test]
    fn test_world_pose_assignment() {
        let mut world = WorldState::new();
        world.add_body("broccoli", Isometry3::identity());

        let pose = RelativePose::in_world("broccoli", Isometry3::translation(0.75, 0.0, 0.75));
        pose.assign(&mut world).unwrap();

        let current = world.frame_pose(&FrameId::body("broccoli")).unwrap();
        assert_relative_eq!(current, Isometry3::translation(0.75, 0.0, 0.75), epsilon = 1e-12);
    }

    #[test]
    fn test_binding_is_lazy() {
        let joints = joint_ids(["slide"]);
        let mut world = WorldState::new();
        world.add_joints(&joints, &DVector::zeros(1));
        world.link_frame("gripper", joints.clone(), |q| Isometry3::translation(q[0], 0.0, 0.0));
        world.add_body("cup", Isometry3::identity());

        let grasp = RelativePose::new(FrameId::body("gripper"), "cup", Isometry3::translation(0.0, 0.1, 0.0));

        // Parent moves after the pose was created; assignment uses the new parent pose
        world.set_joint_position(&joints[0], 0.4).unwrap();
        grasp.assign(&mut world).unwrap();

        let cup = world.frame_pose(&FrameId::body("cup")).unwrap();
        assert_relative_eq!(cup, Isometry3::translation(0.4, 0.1, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_parent_frame() {
        let mut world = WorldState::new();
        world.add_body("cup", Isometry3::identity());
        let grasp = RelativePose::new(FrameId::body("gripper"), "cup", Isometry3::identity());

        assert_eq!(
            grasp.assign(&mut world),
            Err(ContextError::UnknownFrame(FrameId::body("gripper")))
        );
    }
}
