//! Plan postprocessing
//!
//! Expands decoded plan actions into the ordered list of trajectories the
//! robot executes: arm motions, approach and retreat around grasps, and
//! gripper open/close motions.

use thiserror::Error;

use tamp_core::model::same_joints;
use tamp_core::{Configuration, JointInterpolator, Joints, ModelError, Trajectory};

use crate::action::Action;

/// Continuity check errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContinuityError {
    #[error("Gap of {gap} between segment {segment} and the previous arm segment (tolerance {tolerance})")]
    Discontinuity {
        segment: usize,
        gap: f64,
        tolerance: f64,
    },
    #[error("Segment {segment} cannot be compared with the previous arm segment")]
    Incomparable { segment: usize },
}

/// Expands plans into executable trajectories
#[derive(Debug, Clone)]
pub struct PlanPostprocessor {
    gripper_joints: Joints,
    open_traj: Trajectory,
    close_traj: Trajectory,
}

impl PlanPostprocessor {
    /// Build gripper open/close motions between the two finger configurations
    ///
    /// `open_traj = extend(closed, open)`, `close_traj = reverse(open_traj)`.
    pub fn new(
        interpolator: &JointInterpolator,
        closed: &Configuration,
        open: &Configuration,
    ) -> Result<Self, ModelError> {
        let open_traj = Trajectory::from_path(interpolator.extend_configurations(closed, open)?)?;
        let close_traj = open_traj.reverse();
        Ok(Self {
            gripper_joints: interpolator.joints().clone(),
            open_traj,
            close_traj,
        })
    }

    pub fn gripper_joints(&self) -> &Joints {
        &self.gripper_joints
    }

    pub fn open_trajectory(&self) -> &Trajectory {
        &self.open_traj
    }

    pub fn close_trajectory(&self) -> &Trajectory {
        &self.close_traj
    }

    /// Whether a trajectory moves the gripper fingers
    pub fn is_gripper_motion(&self, traj: &Trajectory) -> bool {
        traj.joints()
            .map(|joints| same_joints(joints, &self.gripper_joints))
            .unwrap_or(false)
    }

    /// Expand a plan into trajectories, in execution order
    ///
    /// - pick: approach (reversed, empty hand), close, retreat holding the object
    /// - place: approach (reversed, holding), open, retreat with an empty hand
    /// - move / move_holding: the planned trajectory
    /// - clean / cook: nothing
    pub fn postprocess(&self, plan: &[Action]) -> Vec<Trajectory> {
        let mut trajectories = Vec::new();
        for action in plan {
            match action {
                Action::Clean { .. } | Action::Cook { .. } => {}
                Action::Pick { grasp, traj, .. } => {
                    trajectories.push(traj.reverse().detached());
                    trajectories.push(self.close_traj.clone());
                    trajectories.push(traj.with_attachments(vec![grasp.clone()]));
                }
                Action::Place { grasp, traj, .. } => {
                    trajectories.push(traj.reverse().with_attachments(vec![grasp.clone()]));
                    trajectories.push(self.open_traj.clone());
                    trajectories.push(traj.detached());
                }
                Action::Move { traj, .. } | Action::MoveHolding { traj, .. } => {
                    trajectories.push(traj.clone());
                }
            }
        }
        log::debug!(
            "Postprocessed {} actions into {} trajectories",
            plan.len(),
            trajectories.len()
        );
        trajectories
    }

    /// Check that each arm segment starts where the previous one ended
    ///
    /// Gripper motions are skipped: the arm stays put while they run.
    pub fn validate_continuity(&self, trajectories: &[Trajectory], tolerance: f64) -> Result<(), ContinuityError> {
        let mut previous: Option<&Trajectory> = None;
        for (segment, traj) in trajectories.iter().enumerate() {
            if self.is_gripper_motion(traj) {
                continue;
            }
            if let Some(prev) = previous {
                let gap = prev
                    .last()
                    .distance(traj.first())
                    .ok_or(ContinuityError::Incomparable { segment })?;
                if gap > tolerance {
                    return Err(ContinuityError::Discontinuity {
                        segment,
                        gap,
                        tolerance,
                    });
                }
            }
            previous = Some(traj);
        }
        Ok(())
    }
}
