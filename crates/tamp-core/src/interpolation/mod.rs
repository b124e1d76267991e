//! Joint-space interpolation
//!
//! Turns a pair of configurations into a dense path whose consecutive
//! waypoints move each joint by at most its resolution. This is the single
//! source of path density for every motion generator.
//!
//! Refinement uses the recurrence
//!
//! ```text
//! q_{i+1} = q_i + (1 / (n - i)) · (q_goal - q_i),   i = 0 .. n-1
//! ```
//!
//! rather than `q_0 + (i / n) · (q_goal - q_0)`; the two agree in exact
//! arithmetic but not bit for bit, and paths must match the recurrence.

use std::f64::consts::PI;

use nalgebra::DVector;

use crate::model::{Configuration, Joints, ModelError};

/// Default per-joint step bound [rad]
pub const DEFAULT_RESOLUTION: f64 = 0.005 * PI;

/// Per-joint difference `value2 - value1`
///
/// Every joint is treated as linear. Wrap-around revolute joints would take
/// the shortest signed angle here.
fn joint_difference(value2: f64, value1: f64) -> f64 {
    value2 - value1
}

/// Interpolator over a fixed joint sequence
#[derive(Debug, Clone)]
pub struct JointInterpolator {
    joints: Joints,
    resolutions: DVector<f64>,
}

impl JointInterpolator {
    /// Interpolator with the default resolution on every joint
    pub fn new(joints: Joints) -> Self {
        let resolutions = DVector::from_element(joints.len(), DEFAULT_RESOLUTION);
        Self { joints, resolutions }
    }

    /// Interpolator with one resolution shared by every joint
    pub fn uniform(joints: Joints, resolution: f64) -> Result<Self, ModelError> {
        let resolutions = DVector::from_element(joints.len(), resolution);
        Self::with_resolutions(joints, resolutions)
    }

    /// Interpolator with explicit per-joint resolutions
    pub fn with_resolutions(joints: Joints, resolutions: DVector<f64>) -> Result<Self, ModelError> {
        if joints.len() != resolutions.len() {
            return Err(ModelError::JointCountMismatch {
                joints: joints.len(),
                positions: resolutions.len(),
            });
        }
        if let Some((index, &value)) = resolutions.iter().enumerate().find(|&(_, &r)| !(r > 0.0)) {
            return Err(ModelError::NonPositiveResolution { index, value });
        }
        Ok(Self { joints, resolutions })
    }

    pub fn joints(&self) -> &Joints {
        &self.joints
    }

    pub fn resolutions(&self) -> &DVector<f64> {
        &self.resolutions
    }

    fn check_len(&self, q: &DVector<f64>) -> Result<(), ModelError> {
        if q.len() != self.joints.len() {
            return Err(ModelError::JointCountMismatch {
                joints: self.joints.len(),
                positions: q.len(),
            });
        }
        Ok(())
    }

    /// Elementwise difference `q2 - q1`
    pub fn difference(&self, q2: &DVector<f64>, q1: &DVector<f64>) -> Result<DVector<f64>, ModelError> {
        self.check_len(q2)?;
        self.check_len(q1)?;
        Ok(q2.zip_map(q1, joint_difference))
    }

    /// Lazily yield `num_steps` configurations from `q1` toward `q2`
    ///
    /// `q1` itself is not yielded; the last configuration is `q2`.
    pub fn refine(
        &self,
        q1: &DVector<f64>,
        q2: &DVector<f64>,
        num_steps: usize,
    ) -> Result<Refine, ModelError> {
        self.check_len(q1)?;
        self.check_len(q2)?;
        Ok(Refine {
            joints: self.joints.clone(),
            current: q1.clone(),
            goal: q2.clone(),
            num_steps,
            step: 0,
        })
    }

    /// Number of refinement steps needed between `q1` and `q2`
    ///
    /// floor(max_j |q2_j - q1_j| / resolution_j); zero for identical inputs.
    /// Fails when the count is not finite or does not fit in a path.
    pub fn steps_between(&self, q1: &DVector<f64>, q2: &DVector<f64>) -> Result<usize, ModelError> {
        let difference = self.difference(q2, q1)?;
        let ratios = difference.abs().component_div(&self.resolutions);
        if let Some(&steps) = ratios.iter().find(|s| s.is_nan()) {
            return Err(ModelError::TooManySteps { steps });
        }
        let steps = ratios.iter().fold(0.0_f64, |acc, &s| acc.max(s)).floor();
        if !steps.is_finite() || steps >= usize::MAX as f64 {
            return Err(ModelError::TooManySteps { steps });
        }
        Ok(steps as usize)
    }

    /// Dense path from `q1` to `q2` respecting the per-joint resolution
    ///
    /// Yields `steps_between + 1` configurations, so identical endpoints
    /// still produce a single point.
    pub fn extend(&self, q1: &DVector<f64>, q2: &DVector<f64>) -> Result<Refine, ModelError> {
        let steps = self.steps_between(q1, q2)?;
        let num_steps = steps
            .checked_add(1)
            .ok_or(ModelError::TooManySteps { steps: steps as f64 })?;
        self.refine(q1, q2, num_steps)
    }

    /// [`extend`](Self::extend) between two configurations over this interpolator's joints
    pub fn extend_configurations(
        &self,
        start: &Configuration,
        end: &Configuration,
    ) -> Result<Refine, ModelError> {
        if !start.same_joints(end) || start.joints()[..] != self.joints[..] {
            return Err(ModelError::JointMismatch);
        }
        self.extend(start.positions(), end.positions())
    }
}

/// Lazy refinement sequence returned by [`JointInterpolator::refine`]
#[derive(Debug, Clone)]
pub struct Refine {
    joints: Joints,
    current: DVector<f64>,
    goal: DVector<f64>,
    num_steps: usize,
    step: usize,
}

impl Iterator for Refine {
    type Item = Configuration;

    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.num_steps {
            return None;
        }
        let remaining = (self.num_steps - self.step) as f64;
        let difference = self.goal.zip_map(&self.current, joint_difference);
        self.current = difference * (1.0 / remaining) + &self.current;
        self.step += 1;

        // Lengths are checked when the sequence is created
        Configuration::new(self.joints.clone(), self.current.clone()).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.num_steps - self.step;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Refine {}
