//! Approach inverse kinematics stream (`inverse-kinematics`)
//!
//! Solves for a straight-line approach: the gripper backs away from the
//! grasp pose along a fixed direction in the grasp frame. Either every
//! point on the line is solved or the whole call fails.

use nalgebra::{Isometry3, Translation3, Vector3};

use tamp_core::{Configuration, InverseKinematics, Joints, Trajectory};

use super::{check_arity, grasp_arg, object_arg, pose_arg, single, StreamError, StreamFn, StreamOutputs};
use crate::config::ApproachConfig;
use crate::value::Value;

const STREAM: &str = "inverse-kinematics";

/// IK along an approach line, warm-started from the previous solve
///
/// Inputs `(object, pose, grasp)`, outputs `(conf, traj)` where `conf` is the
/// pre-grasp configuration and `traj` runs from the grasp to the pre-grasp.
#[derive(Debug)]
pub struct ApproachIk<S> {
    solver: S,
    arm_joints: Joints,
    direction: Vector3<f64>,
    offsets: Vec<f64>,
}

impl<S: InverseKinematics> ApproachIk<S> {
    pub fn new(solver: S, arm_joints: Joints, config: &ApproachConfig) -> Result<Self, StreamError> {
        let direction = config
            .direction
            .try_normalize(f64::EPSILON)
            .ok_or(StreamError::DegenerateApproach)?;
        Ok(Self {
            solver,
            arm_joints,
            direction,
            offsets: config.offsets(),
        })
    }

    /// Number of IK solves per call
    pub fn num_solves(&self) -> usize {
        self.offsets.len()
    }

    /// Solve the approach for a gripper grasp pose
    ///
    /// `Ok(None)` as soon as any solve fails.
    pub fn solve_approach(&self, grasp_pose: &Isometry3<f64>) -> Result<Option<Vec<Configuration>>, StreamError> {
        let mut path = Vec::with_capacity(self.offsets.len());
        let mut solution = None;

        for (i, &t) in self.offsets.iter().enumerate() {
            let target = grasp_pose * Translation3::from(t * self.direction);
            let positions = match self.solver.solve(&target, solution.as_ref()) {
                Some(positions) => positions,
                None => {
                    log::debug!("IK failed at approach offset {:.3} (solve {})", t, i + 1);
                    return Ok(None);
                }
            };
            if positions.len() != self.arm_joints.len() {
                return Err(StreamError::SolutionDimension {
                    expected: self.arm_joints.len(),
                    got: positions.len(),
                });
            }
            path.push(Configuration::new(self.arm_joints.clone(), positions.clone())?);
            solution = Some(positions);
        }
        Ok(Some(path))
    }
}

impl<S: InverseKinematics> StreamFn for ApproachIk<S> {
    fn call(&mut self, inputs: &[Value]) -> Result<StreamOutputs, StreamError> {
        check_arity(STREAM, inputs, 3)?;
        let object = object_arg(STREAM, inputs, 0)?;
        let pose = pose_arg(STREAM, inputs, 1)?;
        let grasp = grasp_arg(STREAM, inputs, 2)?;
        if grasp.child() != object {
            return Err(StreamError::GraspMismatch {
                object: object.to_string(),
                grasp: grasp.child().to_string(),
            });
        }

        let grasp_pose = pose.transform() * grasp.transform().inverse();
        let outputs = match self.solve_approach(&grasp_pose)? {
            Some(path) => {
                let conf = path[path.len() - 1].clone();
                let traj = Trajectory::from_path(path)?;
                log::debug!("Approach for {} solved with {} waypoints", object, traj.len());
                Some(vec![Value::Conf(conf), Value::Traj(traj)])
            }
            None => None,
        };
        Ok(single(outputs))
    }
}
