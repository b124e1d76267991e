//! Kitchen pick-and-cook scenario
//!
//! A KUKA iiwa with a Schunk WSG-50 gripper stands at one table. A second
//! table holds a sink, a stove, and a piece of broccoli. The goal is to cook
//! the broccoli (clean it in the sink first) and return the arm home.

use std::collections::BTreeMap;
use std::sync::Arc;

use nalgebra::{DVector, Isometry3, Vector3};

use tamp_core::geometry::{aabb_z_placement, BoundingBox, DEFAULT_Z_EPSILON};
use tamp_core::{joint_ids, Configuration, ContextError, FrameId, JointInterpolator, Joints, ModelError, WorldState};

use crate::config::BridgeConfig;
use crate::convert::BreakpointConverter;
use crate::pipeline::{Pipeline, PipelineError};
use crate::postprocess::PlanPostprocessor;
use crate::problem::ProblemBuilder;
use crate::scene::Scene;

/// iiwa joint names, base to flange
pub const IIWA_JOINTS: [&str; 7] = [
    "iiwa_joint_1",
    "iiwa_joint_2",
    "iiwa_joint_3",
    "iiwa_joint_4",
    "iiwa_joint_5",
    "iiwa_joint_6",
    "iiwa_joint_7",
];

pub const WSG50_LEFT_FINGER: &str = "left_finger_sliding_joint";
pub const WSG50_RIGHT_FINGER: &str = "right_finger_sliding_joint";

/// Finger positions (left, right) with the gripper open [m]
///
/// Left finger at its lower limit, right finger at its upper limit.
pub const WSG50_OPEN: [f64; 2] = [-0.055, 0.055];

/// Finger positions (left, right) with the gripper closed [m]
pub const WSG50_CLOSED: [f64; 2] = [0.0, 0.0];

/// Name of the frame grasps are expressed in
pub const GRIPPER_FRAME: &str = "gripper";

/// Table surface box (both tables share the model)
pub fn table_aabb() -> BoundingBox {
    BoundingBox::from_size(Vector3::new(0.0, 0.0, 0.736), Vector3::new(0.7122, 0.762, 0.057))
}

/// Broccoli box
pub fn broccoli_aabb() -> BoundingBox {
    BoundingBox::new(Vector3::new(0.0, 0.0, 0.05), Vector3::new(0.025, 0.025, 0.05))
}

/// Sink and stove footprint markers
pub fn marker_aabb() -> BoundingBox {
    BoundingBox::from_size(Vector3::new(0.0, 0.0, 0.025), Vector3::new(0.025, 0.025, 0.05))
}

/// Scenario layout
#[derive(Debug, Clone)]
pub struct KitchenScenario {
    /// Bounding box per body
    pub aabbs: BTreeMap<String, BoundingBox>,
    /// x of the second table [m]
    pub table2_x: f64,
    /// y of the sink on the second table [m]
    pub sink_y: f64,
    /// y of the stove on the second table [m]
    pub stove_y: f64,
    /// y of the broccoli on the second table [m]
    pub broccoli_y: f64,
    /// Arm start configuration [rad]
    pub initial_arm: DVector<f64>,
    /// Objects the robot can pick up
    pub movable: Vec<String>,
    /// Surfaces objects can be placed on
    pub surfaces: Vec<String>,
}

impl Default for KitchenScenario {
    fn default() -> Self {
        let aabbs = [
            ("table", table_aabb()),
            ("table2", table_aabb()),
            ("broccoli", broccoli_aabb()),
            ("sink", marker_aabb()),
            ("stove", marker_aabb()),
        ]
        .into_iter()
        .map(|(name, aabb)| (name.to_string(), aabb))
        .collect();

        Self {
            aabbs,
            table2_x: 0.75,
            sink_y: 0.25,
            stove_y: -0.25,
            broccoli_y: 0.0,
            initial_arm: DVector::zeros(IIWA_JOINTS.len()),
            movable: vec!["broccoli".to_string()],
            surfaces: vec!["sink".to_string(), "stove".to_string()],
        }
    }
}

impl KitchenScenario {
    pub fn arm_joints(&self) -> Joints {
        joint_ids(IIWA_JOINTS)
    }

    pub fn gripper_joints(&self) -> Joints {
        joint_ids([WSG50_LEFT_FINGER, WSG50_RIGHT_FINGER])
    }

    /// Bounding box of a named body
    pub fn aabb(&self, name: &str) -> Result<&BoundingBox, ContextError> {
        self.aabbs
            .get(name)
            .ok_or_else(|| ContextError::UnknownBody(name.to_string()))
    }

    /// Height at which objects rest on the tables [m]
    pub fn table_top_z(&self) -> Result<f64, ContextError> {
        Ok(aabb_z_placement(self.aabb("sink")?, self.aabb("table")?, DEFAULT_Z_EPSILON))
    }

    /// World pose of the arm base, on top of the first table
    pub fn robot_base(&self) -> Result<Isometry3<f64>, ContextError> {
        Ok(Isometry3::translation(0.0, 0.0, self.table_top_z()?))
    }

    /// Initial world pose of every body
    pub fn body_poses(&self) -> Result<Vec<(String, Isometry3<f64>)>, ContextError> {
        let z = self.table_top_z()?;
        Ok(vec![
            ("table".to_string(), Isometry3::identity()),
            ("table2".to_string(), Isometry3::translation(self.table2_x, 0.0, 0.0)),
            ("sink".to_string(), Isometry3::translation(self.table2_x, self.sink_y, z)),
            ("stove".to_string(), Isometry3::translation(self.table2_x, self.stove_y, z)),
            ("broccoli".to_string(), Isometry3::translation(self.table2_x, self.broccoli_y, z)),
        ])
    }

    pub fn initial_configuration(&self) -> Result<Configuration, ModelError> {
        Configuration::new(self.arm_joints(), self.initial_arm.clone())
    }

    pub fn open_configuration(&self) -> Result<Configuration, ModelError> {
        Configuration::from_slice(self.gripper_joints(), &WSG50_OPEN)
    }

    pub fn closed_configuration(&self) -> Result<Configuration, ModelError> {
        Configuration::from_slice(self.gripper_joints(), &WSG50_CLOSED)
    }

    /// In-memory world with the arm at its start, the gripper open, and
    /// every body placed
    ///
    /// `forward_kinematics` maps arm positions to the gripper pose relative
    /// to the arm base.
    pub fn world(
        &self,
        forward_kinematics: impl Fn(&DVector<f64>) -> Isometry3<f64> + 'static,
    ) -> Result<WorldState, ContextError> {
        let mut world = WorldState::new();
        world.add_joints(&self.arm_joints(), &self.initial_arm);
        world.add_joints(&self.gripper_joints(), &DVector::from_row_slice(&WSG50_OPEN));
        for (name, pose) in self.body_poses()? {
            world.add_body(name, pose);
        }

        let base = self.robot_base()?;
        world.link_frame(GRIPPER_FRAME, self.arm_joints(), move |q| base * forward_kinematics(q));
        Ok(world)
    }

    /// Capture the scene from a context
    pub fn scene(&self, context: &WorldState) -> Result<Scene, ContextError> {
        Scene::capture(
            FrameId::body(GRIPPER_FRAME),
            self.aabbs.iter().map(|(name, aabb)| (name.clone(), *aabb)),
            context,
        )
    }

    /// Problem builder for cooking the first movable object
    pub fn problem_builder(&self, scene: Arc<Scene>, config: &BridgeConfig) -> Result<ProblemBuilder, ModelError> {
        let mut builder = ProblemBuilder::new(scene, self.initial_configuration()?, config.clone());
        for object in &self.movable {
            builder = builder.movable(object.as_str());
        }
        for surface in &self.surfaces {
            builder = builder.surface(surface.as_str());
        }
        Ok(builder)
    }

    /// Postprocessing and conversion for the iiwa and WSG-50
    pub fn pipeline(&self, config: &BridgeConfig) -> Result<Pipeline, PipelineError> {
        let gripper = JointInterpolator::uniform(self.gripper_joints(), config.interpolation.resolution)?;
        let postprocessor =
            PlanPostprocessor::new(&gripper, &self.closed_configuration()?, &self.open_configuration()?)?;
        let converter = BreakpointConverter::new(self.arm_joints(), self.gripper_joints(), &config.conversion)?;
        Ok(Pipeline::new(postprocessor, converter, config.continuity_tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tamp_core::PhysicalContext;

    #[test]
    fn test_table_top_height() {
        let scenario = KitchenScenario::default();

        // Table top at 0.736 + 0.0285, sink bottom at 0, plus clearance
        assert_relative_eq!(scenario.table_top_z().unwrap(), 0.7655, epsilon = 1e-12);
        assert_relative_eq!(scenario.robot_base().unwrap().translation.vector.z, 0.7655, epsilon = 1e-12);
    }

    #[test]
    fn test_world_layout() {
        let scenario = KitchenScenario::default();
        let world = scenario.world(|_| Isometry3::identity()).unwrap();

        let sink = world.frame_pose(&FrameId::body("sink")).unwrap();
        assert_relative_eq!(sink.translation.vector, Vector3::new(0.75, 0.25, 0.7655), epsilon = 1e-12);

        let gripper = world.frame_pose(&FrameId::body(GRIPPER_FRAME)).unwrap();
        assert_relative_eq!(gripper.translation.vector.z, 0.7655, epsilon = 1e-12);

        let right = world
            .joint_position(&tamp_core::JointId::new(WSG50_RIGHT_FINGER))
            .unwrap();
        assert_relative_eq!(right, 0.055);
    }

    #[test]
    fn test_missing_body_is_reported() {
        let mut scenario = KitchenScenario::default();
        scenario.aabbs.remove("sink");

        assert_eq!(
            scenario.table_top_z().unwrap_err(),
            ContextError::UnknownBody("sink".to_string())
        );
        assert!(scenario.world(|_| Isometry3::identity()).is_err());
    }

    #[test]
    fn test_scene_covers_every_body() {
        let scenario = KitchenScenario::default();
        let world = scenario.world(|_| Isometry3::identity()).unwrap();
        let scene = scenario.scene(&world).unwrap();

        assert_eq!(scene.objects().count(), 5);
        assert!(scene.world_pose("broccoli").is_some());
        assert_eq!(scene.gripper_frame(), &FrameId::body(GRIPPER_FRAME));
    }

    #[test]
    fn test_pipeline_joint_counts() {
        let scenario = KitchenScenario::default();
        let pipeline = scenario.pipeline(&BridgeConfig::default()).unwrap();

        assert_eq!(pipeline.postprocessor().gripper_joints().len(), 2);
        assert_eq!(scenario.arm_joints().len(), 7);
    }
}
