//! Stable placement stream (`sample-pose`)

use std::sync::Arc;

use rand::rngs::StdRng;

use tamp_core::geometry::PlacementSampler;
use tamp_core::RelativePose;

use super::{check_arity, fork_rng, object_arg, StreamError, StreamFn, StreamOutputs};
use crate::config::PlacementConfig;
use crate::scene::Scene;
use crate::value::Value;

const STREAM: &str = "sample-pose";

/// Samples world poses resting an object on a surface
///
/// Inputs `(object, surface)`, outputs `(pose)`. Infinite.
#[derive(Debug)]
pub struct StablePlacement {
    scene: Arc<Scene>,
    z_epsilon: f64,
    rng: StdRng,
}

impl StablePlacement {
    pub fn new(scene: Arc<Scene>, config: &PlacementConfig, rng: StdRng) -> Self {
        Self {
            scene,
            z_epsilon: config.z_epsilon,
            rng,
        }
    }
}

impl StreamFn for StablePlacement {
    fn call(&mut self, inputs: &[Value]) -> Result<StreamOutputs, StreamError> {
        check_arity(STREAM, inputs, 2)?;
        let object = object_arg(STREAM, inputs, 0)?;
        let surface = object_arg(STREAM, inputs, 1)?;

        let unknown = |name: &str| StreamError::UnknownObject(name.to_string());
        let object_aabb = self.scene.aabb(object).ok_or_else(|| unknown(object))?;
        let surface_aabb = self.scene.aabb(surface).ok_or_else(|| unknown(surface))?;
        let surface_pose = *self.scene.world_pose(surface).ok_or_else(|| unknown(surface))?;

        log::debug!("Sampling placements of {} on {}", object, surface);

        let sampler = PlacementSampler::new(
            object_aabb,
            surface_aabb,
            self.z_epsilon,
            fork_rng(&mut self.rng),
        );
        let object = object.to_string();
        Ok(Box::new(sampler.map(move |local| {
            let pose = RelativePose::in_world(object.clone(), surface_pose * local);
            vec![Value::Pose(pose)]
        })))
    }
}
