//! Static scene description shared by the stream generators
//!
//! Bounding boxes are fixed per object name. World poses are captured from
//! the physical context once, when the problem is built, so samplers never
//! touch the context while the planner searches.

use std::collections::BTreeMap;

use nalgebra::Isometry3;

use tamp_core::geometry::BoundingBox;
use tamp_core::{ContextError, FrameId, PhysicalContext};

/// Object extents, captured world poses, and the gripper frame
#[derive(Debug, Clone)]
pub struct Scene {
    aabbs: BTreeMap<String, BoundingBox>,
    poses: BTreeMap<String, Isometry3<f64>>,
    gripper_frame: FrameId,
}

impl Scene {
    /// Empty scene with the frame grasps are expressed in
    pub fn new(gripper_frame: FrameId) -> Self {
        Self {
            aabbs: BTreeMap::new(),
            poses: BTreeMap::new(),
            gripper_frame,
        }
    }

    /// Capture the current world pose of every named body
    ///
    /// Fails if any body is unknown to the context.
    pub fn capture<C, I, S>(gripper_frame: FrameId, aabbs: I, context: &C) -> Result<Self, ContextError>
    where
        C: PhysicalContext + ?Sized,
        I: IntoIterator<Item = (S, BoundingBox)>,
        S: Into<String>,
    {
        let mut scene = Self::new(gripper_frame);
        for (name, aabb) in aabbs {
            let name = name.into();
            let pose = context.frame_pose(&FrameId::body(name.clone()))?;
            scene.insert(name, aabb, pose);
        }
        Ok(scene)
    }

    /// Add or replace an object
    pub fn insert(&mut self, name: impl Into<String>, aabb: BoundingBox, pose: Isometry3<f64>) {
        let name = name.into();
        self.aabbs.insert(name.clone(), aabb);
        self.poses.insert(name, pose);
    }

    pub fn aabb(&self, name: &str) -> Option<&BoundingBox> {
        self.aabbs.get(name)
    }

    /// World pose captured for `name`
    pub fn world_pose(&self, name: &str) -> Option<&Isometry3<f64>> {
        self.poses.get(name)
    }

    pub fn gripper_frame(&self) -> &FrameId {
        &self.gripper_frame
    }

    /// Names of every object in the scene
    pub fn objects(&self) -> impl Iterator<Item = &str> {
        self.aabbs.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use tamp_core::WorldState;

    #[test]
    fn test_capture_reads_world_poses() {
        let mut world = WorldState::new();
        world.add_body("sink", Isometry3::translation(0.75, 0.25, 0.765));

        let aabb = BoundingBox::from_size(Vector3::new(0.0, 0.0, 0.025), Vector3::new(0.025, 0.025, 0.05));
        let scene = Scene::capture(FrameId::body("gripper"), [("sink", aabb)], &world).unwrap();

        assert_relative_eq!(
            scene.world_pose("sink").unwrap().translation.vector,
            Vector3::new(0.75, 0.25, 0.765),
            epsilon = 1e-12
        );
        assert_eq!(scene.aabb("sink"), Some(&aabb));
        assert_eq!(scene.objects().collect::<Vec<_>>(), vec!["sink"]);
    }

    #[test]
    fn test_capture_unknown_body() {
        let world = WorldState::new();
        let aabb = BoundingBox::new(Vector3::zeros(), Vector3::repeat(0.1));

        let result = Scene::capture(FrameId::body("gripper"), [("stove", aabb)], &world);
        assert_eq!(
            result.unwrap_err(),
            ContextError::UnknownFrame(FrameId::body("stove"))
        );
    }
}
