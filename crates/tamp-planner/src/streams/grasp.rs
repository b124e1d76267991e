//! Top cylinder grasp stream (`sample-grasp`)
//!
//! Treats the object's bounding box as an upright cylinder and grasps it from
//! above, with a random rotation about the vertical axis. The gripper's y axis
//! points out of the palm.

use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

use nalgebra::{Isometry3, Vector3};
use rand::rngs::StdRng;
use rand::Rng;

use tamp_core::geometry::BoundingBox;
use tamp_core::math::{rotation_rpy, rotation_z, translation};
use tamp_core::RelativePose;

use super::{check_arity, fork_rng, object_arg, StreamError, StreamFn, StreamOutputs};
use crate::config::GraspConfig;
use crate::scene::Scene;
use crate::value::Value;

const STREAM: &str = "sample-grasp";

/// Infinite sequence of gripper-from-object transforms for one object
///
/// T = reflect_z · rot_z(θ) · translate_z(−h/2 + grasp_length)
///     · tool(0, 0, −tool_offset) · translation(−center),  θ ~ U[0, 2π)
#[derive(Debug, Clone)]
pub struct TopGrasps<R> {
    reflect_z: Isometry3<f64>,
    body_offset: Isometry3<f64>,
    rng: R,
}

impl<R: Rng> TopGrasps<R> {
    /// Grasp sequence for `aabb`, or `None` if it is too wide to grasp
    pub fn new(aabb: &BoundingBox, config: &GraspConfig, rng: R) -> Option<Self> {
        let diameter = aabb.footprint_diameter();
        if let Some(max_width) = config.max_width {
            if max_width < diameter {
                return None;
            }
        }

        let height = aabb.size().z;
        let tool = translation(0.0, 0.0, -config.tool_offset);
        let translate_z = translation(0.0, 0.0, -height / 2.0 + config.grasp_length);
        let aabb_from_body = Isometry3::translation(aabb.center.x, aabb.center.y, aabb.center.z).inverse();

        Some(Self {
            reflect_z: rotation_rpy(FRAC_PI_2, 0.0, 0.0),
            body_offset: translate_z * tool * aabb_from_body,
            rng,
        })
    }
}

impl<R: Rng> Iterator for TopGrasps<R> {
    type Item = Isometry3<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        let theta = self.rng.gen_range(0.0..2.0 * PI);
        Some(self.reflect_z * rotation_z(theta) * self.body_offset)
    }
}

/// Object center in the gripper frame for every top grasp
///
/// Independent of the sampled rotation, since the center lies on the
/// rotation axis.
pub fn grasp_center_offset(aabb: &BoundingBox, config: &GraspConfig) -> Vector3<f64> {
    let height = aabb.size().z;
    Vector3::new(0.0, config.tool_offset + height / 2.0 - config.grasp_length, 0.0)
}

/// Samples grasps of an object
///
/// Inputs `(object)`, outputs `(grasp)`. Infinite, or empty when the object
/// is wider than the gripper opening.
#[derive(Debug)]
pub struct TopGraspSampler {
    scene: Arc<Scene>,
    config: GraspConfig,
    rng: StdRng,
}

impl TopGraspSampler {
    pub fn new(scene: Arc<Scene>, config: &GraspConfig, rng: StdRng) -> Self {
        Self {
            scene,
            config: config.clone(),
            rng,
        }
    }
}

impl StreamFn for TopGraspSampler {
    fn call(&mut self, inputs: &[Value]) -> Result<StreamOutputs, StreamError> {
        check_arity(STREAM, inputs, 1)?;
        let object = object_arg(STREAM, inputs, 0)?;
        let aabb = self
            .scene
            .aabb(object)
            .ok_or_else(|| StreamError::UnknownObject(object.to_string()))?;

        let grasps = match TopGrasps::new(aabb, &self.config, fork_rng(&mut self.rng)) {
            Some(grasps) => grasps,
            None => {
                log::info!(
                    "{} is too wide to grasp ({:.3} m)",
                    object,
                    aabb.footprint_diameter()
                );
                return Ok(Box::new(std::iter::empty()));
            }
        };

        let gripper_frame = self.scene.gripper_frame().clone();
        let object = object.to_string();
        Ok(Box::new(grasps.map(move |transform| {
            let grasp = RelativePose::new(gripper_frame.clone(), object.clone(), transform);
            vec![Value::Grasp(grasp)]
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use tamp_core::FrameId;

    use crate::streams::seeded_rng;

    fn broccoli() -> BoundingBox {
        BoundingBox::new(Vector3::new(0.0, 0.0, 0.05), Vector3::new(0.025, 0.025, 0.05))
    }

    fn scene() -> Arc<Scene> {
        let mut scene = Scene::new(FrameId::body("gripper"));
        scene.insert("broccoli", broccoli(), Isometry3::identity());
        Arc::new(scene)
    }

    #[test]
    fn test_too_wide_is_empty() {
        let config = GraspConfig {
            max_width: Some(0.04),
            ..Default::default()
        };
        let mut stream = TopGraspSampler::new(scene(), &config, seeded_rng(Some(1)));

        let mut outputs = stream.call(&[Value::object("broccoli")]).unwrap();
        assert!(outputs.next().is_none());
    }

    #[test]
    fn test_exact_width_is_graspable() {
        let config = GraspConfig {
            max_width: Some(0.05),
            ..Default::default()
        };
        assert!(TopGrasps::new(&broccoli(), &config, seeded_rng(Some(1))).is_some());
    }

    #[test]
    fn test_grasps_are_rigid_with_approach_offset() {
        let config = GraspConfig::default();
        let aabb = broccoli();
        let expected = grasp_center_offset(&aabb, &config);
        assert_relative_eq!(expected, Vector3::new(0.0, 0.15, 0.0), epsilon = 1e-12);

        let grasps = TopGrasps::new(&aabb, &config, seeded_rng(Some(42))).unwrap();
        for transform in grasps.take(100) {
            // Rotation stays orthonormal with unit determinant
            let rotation = transform.rotation.to_rotation_matrix();
            assert_relative_eq!(rotation.matrix().determinant(), 1.0, epsilon = 1e-9);

            let center = transform * Point3::from(aabb.center);
            assert_relative_eq!(center.coords, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_grasp_values_reference_gripper() {
        let mut stream = TopGraspSampler::new(scene(), &GraspConfig::default(), seeded_rng(Some(5)));
        let outputs: Vec<_> = stream.call(&[Value::object("broccoli")]).unwrap().take(3).collect();

        assert_eq!(outputs.len(), 3);
        for output in outputs {
            let grasp = output[0].as_grasp().unwrap();
            assert_eq!(grasp.parent(), &FrameId::body("gripper"));
            assert_eq!(grasp.child(), "broccoli");
        }
    }
}
