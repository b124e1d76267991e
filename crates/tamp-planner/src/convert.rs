//! Trajectory to breakpoint conversion
//!
//! Turns postprocessed trajectories into timed arm segments for a
//! downstream tracking controller, plus one gripper setpoint per segment.
//! Gripper motions become arm holds; arm motions become a single cubic
//! from the first to the last waypoint with zero boundary velocities.

use nalgebra::DVector;
use thiserror::Error;

use tamp_core::{Configuration, ContextError, Joints, PhysicalContext, Trajectory};

use crate::config::ConversionConfig;

/// Conversion errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Segment {segment} moves {count} joints; expected {arm} (arm) or {gripper} (gripper)")]
    UnsupportedJointCount {
        segment: usize,
        count: usize,
        arm: usize,
        gripper: usize,
    },
    #[error("Segment {segment} is not a joint-space path")]
    NotJointSpace { segment: usize },
    #[error("Arm and gripper must have different, non-zero joint counts ({arm} and {gripper})")]
    AmbiguousJoints { arm: usize, gripper: usize },
    #[error("Context error: {0}")]
    Context(#[from] ContextError),
}

/// Timed arm segment
#[derive(Debug, Clone, PartialEq)]
pub enum MotionSegment {
    /// Hold `positions` over `[breaks[0], breaks[1]]`
    Hold {
        positions: DVector<f64>,
        breaks: [f64; 2],
    },
    /// Cubic Hermite between two configurations
    Cubic {
        start: DVector<f64>,
        end: DVector<f64>,
        start_velocity: DVector<f64>,
        end_velocity: DVector<f64>,
        breaks: [f64; 2],
    },
}

impl MotionSegment {
    /// Cubic from `start` to `end` with zero boundary velocities
    pub fn rest_to_rest(start: DVector<f64>, end: DVector<f64>, duration: f64) -> Self {
        let zeros = DVector::zeros(start.len());
        MotionSegment::Cubic {
            start_velocity: zeros.clone(),
            end_velocity: zeros,
            start,
            end,
            breaks: [0.0, duration],
        }
    }

    pub fn breaks(&self) -> [f64; 2] {
        match self {
            MotionSegment::Hold { breaks, .. } | MotionSegment::Cubic { breaks, .. } => *breaks,
        }
    }

    pub fn start_time(&self) -> f64 {
        self.breaks()[0]
    }

    pub fn end_time(&self) -> f64 {
        self.breaks()[1]
    }

    /// Positions at time `t`, clamped to the segment's breaks
    pub fn evaluate(&self, t: f64) -> DVector<f64> {
        match self {
            MotionSegment::Hold { positions, .. } => positions.clone(),
            MotionSegment::Cubic {
                start,
                end,
                start_velocity,
                end_velocity,
                breaks,
            } => {
                let h = breaks[1] - breaks[0];
                if h <= 0.0 {
                    return end.clone();
                }
                let s = ((t - breaks[0]) / h).clamp(0.0, 1.0);
                let s2 = s * s;
                let s3 = s2 * s;

                // Hermite basis
                let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
                let h10 = s3 - 2.0 * s2 + s;
                let h01 = -2.0 * s3 + 3.0 * s2;
                let h11 = s3 - s2;

                start * h00 + start_velocity * (h10 * h) + end * h01 + end_velocity * (h11 * h)
            }
        }
    }
}

/// Converted plan
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// One arm segment per trajectory
    pub segments: Vec<MotionSegment>,
    /// Finger position at the end of each segment
    pub gripper_setpoints: Vec<f64>,
}

/// Classifies trajectories by joint count and emits timed segments
#[derive(Debug, Clone)]
pub struct BreakpointConverter {
    arm_joints: Joints,
    gripper_joints: Joints,
    config: ConversionConfig,
}

impl BreakpointConverter {
    pub fn new(arm_joints: Joints, gripper_joints: Joints, config: &ConversionConfig) -> Result<Self, ConversionError> {
        if gripper_joints.is_empty() || arm_joints.is_empty() || arm_joints.len() == gripper_joints.len() {
            return Err(ConversionError::AmbiguousJoints {
                arm: arm_joints.len(),
                gripper: gripper_joints.len(),
            });
        }
        Ok(Self {
            arm_joints,
            gripper_joints,
            config: config.clone(),
        })
    }

    /// Convert trajectories in execution order
    ///
    /// The context is advanced to the end of each trajectory as it goes, so
    /// holds capture the arm where the previous motion left it.
    pub fn convert<C>(&self, context: &mut C, trajectories: &[Trajectory]) -> Result<Conversion, ConversionError>
    where
        C: PhysicalContext + ?Sized,
    {
        let duration = self.config.segment_duration;
        let mut segments = Vec::with_capacity(trajectories.len());
        let mut gripper_setpoints = Vec::with_capacity(trajectories.len());

        for (segment, traj) in trajectories.iter().enumerate() {
            traj.last().assign(context)?;
            let count = traj
                .joint_count()
                .ok_or(ConversionError::NotJointSpace { segment })?;

            let motion = if count == self.gripper_joints.len() {
                let arm = Configuration::from_context(self.arm_joints.clone(), context)?;
                MotionSegment::Hold {
                    positions: arm.positions().clone(),
                    breaks: [0.0, duration],
                }
            } else if count == self.arm_joints.len() {
                // Both ends are configurations since the first one is
                match (traj.first().as_configuration(), traj.last().as_configuration()) {
                    (Some(first), Some(last)) => {
                        MotionSegment::rest_to_rest(first.positions().clone(), last.positions().clone(), duration)
                    }
                    _ => return Err(ConversionError::NotJointSpace { segment }),
                }
            } else {
                return Err(ConversionError::UnsupportedJointCount {
                    segment,
                    count,
                    arm: self.arm_joints.len(),
                    gripper: self.gripper_joints.len(),
                });
            };
            segments.push(motion);

            let finger = &self.gripper_joints[self.gripper_joints.len() - 1];
            gripper_setpoints.push(context.joint_position(finger)?);
        }

        log::info!("Converted {} trajectories into segments", segments.len());
        Ok(Conversion {
            segments,
            gripper_setpoints,
        })
    }

    /// Total execution time with the configured padding
    pub fn duration(&self, segments: &[MotionSegment]) -> f64 {
        compute_duration(segments, &self.config)
    }
}

/// Σ (end_time + padding) over all segments, plus the settle time
pub fn compute_duration(segments: &[MotionSegment], config: &ConversionConfig) -> f64 {
    segments
        .iter()
        .map(|segment| segment.end_time() + config.segment_padding)
        .sum::<f64>()
        + config.settle_time
}
