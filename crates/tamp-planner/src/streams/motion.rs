//! Joint-space motion streams (`plan-free-motion`, `plan-holding-motion`)
//!
//! Straight-line joint interpolation without collision checking. Paths start
//! at the initial configuration so consecutive segments join exactly.

use std::iter;

use tamp_core::{Configuration, JointInterpolator, RelativePose, Trajectory};

use super::{check_arity, conf_arg, grasp_arg, object_arg, single, StreamError, StreamFn, StreamOutputs};
use crate::value::Value;

const FREE_STREAM: &str = "plan-free-motion";
const HOLDING_STREAM: &str = "plan-holding-motion";

fn interpolate(
    interpolator: &JointInterpolator,
    q1: &Configuration,
    q2: &Configuration,
    attachments: Vec<RelativePose>,
) -> Result<Trajectory, StreamError> {
    let path = iter::once(q1.clone()).chain(interpolator.extend_configurations(q1, q2)?);
    Ok(Trajectory::new(path, attachments)?)
}

/// Arm motion with an empty hand
///
/// Inputs `(q1, q2)`, outputs `(traj)`.
#[derive(Debug, Clone)]
pub struct FreeMotion {
    interpolator: JointInterpolator,
}

impl FreeMotion {
    pub fn new(interpolator: JointInterpolator) -> Self {
        Self { interpolator }
    }
}

impl StreamFn for FreeMotion {
    fn call(&mut self, inputs: &[Value]) -> Result<StreamOutputs, StreamError> {
        check_arity(FREE_STREAM, inputs, 2)?;
        let q1 = conf_arg(FREE_STREAM, inputs, 0)?;
        let q2 = conf_arg(FREE_STREAM, inputs, 1)?;

        let traj = interpolate(&self.interpolator, q1, q2, Vec::new())?;
        log::debug!("Free motion with {} waypoints", traj.len());
        Ok(single(Some(vec![Value::Traj(traj)])))
    }
}

/// Arm motion carrying a grasped object
///
/// Inputs `(q1, q2, object, grasp)`, outputs `(traj)` with the grasp attached.
#[derive(Debug, Clone)]
pub struct HoldingMotion {
    interpolator: JointInterpolator,
}

impl HoldingMotion {
    pub fn new(interpolator: JointInterpolator) -> Self {
        Self { interpolator }
    }
}

impl StreamFn for HoldingMotion {
    fn call(&mut self, inputs: &[Value]) -> Result<StreamOutputs, StreamError> {
        check_arity(HOLDING_STREAM, inputs, 4)?;
        let q1 = conf_arg(HOLDING_STREAM, inputs, 0)?;
        let q2 = conf_arg(HOLDING_STREAM, inputs, 1)?;
        let object = object_arg(HOLDING_STREAM, inputs, 2)?;
        let grasp = grasp_arg(HOLDING_STREAM, inputs, 3)?;
        if grasp.child() != object {
            return Err(StreamError::GraspMismatch {
                object: object.to_string(),
                grasp: grasp.child().to_string(),
            });
        }

        let traj = interpolate(&self.interpolator, q1, q2, vec![grasp.clone()])?;
        log::debug!("Holding motion of {} with {} waypoints", object, traj.len());
        Ok(single(Some(vec![Value::Traj(traj)])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Isometry3;
    use tamp_core::{joint_ids, FrameId, Joints, ModelError};

    fn arm() -> Joints {
        joint_ids(["j1", "j2"])
    }

    fn conf(values: &[f64]) -> Configuration {
        Configuration::from_slice(arm(), values).unwrap()
    }

    #[test]
    fn test_free_motion_starts_and_ends_at_inputs() {
        let mut stream = FreeMotion::new(JointInterpolator::uniform(arm(), 0.1).unwrap());
        let q1 = conf(&[0.0, 0.0]);
        let q2 = conf(&[0.35, -0.2]);

        let outputs: Vec<_> = stream.call(&[Value::Conf(q1.clone()), Value::Conf(q2)]).unwrap().collect();
        let traj = outputs[0][0].as_traj().unwrap();

        // Start plus floor(0.35 / 0.1) + 1 interpolated points
        assert_eq!(traj.len(), 5);
        assert_eq!(traj.first().as_configuration(), Some(&q1));
        assert!(traj.attachments().is_empty());
        let last = traj.last().as_configuration().unwrap();
        assert!((last.positions()[0] - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_free_motion_same_configuration() {
        let mut stream = FreeMotion::new(JointInterpolator::new(arm()));
        let q = conf(&[0.3, 0.3]);

        let outputs: Vec<_> = stream.call(&[Value::Conf(q.clone()), Value::Conf(q)]).unwrap().collect();
        assert_eq!(outputs[0][0].as_traj().unwrap().len(), 2);
    }

    #[test]
    fn test_holding_motion_attaches_grasp() {
        let mut stream = HoldingMotion::new(JointInterpolator::new(arm()));
        let grasp = RelativePose::new(FrameId::body("gripper"), "broccoli", Isometry3::identity());
        let inputs = [
            Value::Conf(conf(&[0.0, 0.0])),
            Value::Conf(conf(&[0.1, 0.1])),
            Value::object("broccoli"),
            Value::Grasp(grasp.clone()),
        ];

        let outputs: Vec<_> = stream.call(&inputs).unwrap().collect();
        assert_eq!(outputs[0][0].as_traj().unwrap().attachments(), &[grasp]);
    }

    #[test]
    fn test_holding_motion_rejects_foreign_grasp() {
        let mut stream = HoldingMotion::new(JointInterpolator::new(arm()));
        let grasp = RelativePose::new(FrameId::body("gripper"), "cup", Isometry3::identity());
        let inputs = [
            Value::Conf(conf(&[0.0, 0.0])),
            Value::Conf(conf(&[0.1, 0.1])),
            Value::object("broccoli"),
            Value::Grasp(grasp),
        ];

        assert!(matches!(stream.call(&inputs), Err(StreamError::GraspMismatch { .. })));
    }

    #[test]
    fn test_mismatched_joints() {
        let mut stream = FreeMotion::new(JointInterpolator::new(arm()));
        let other = Configuration::from_slice(joint_ids(["left", "right"]), &[0.0, 0.0]).unwrap();

        assert!(matches!(
            stream.call(&[Value::Conf(conf(&[0.0, 0.0])), Value::Conf(other)]),
            Err(StreamError::Model(ModelError::JointMismatch))
        ));
    }
}
