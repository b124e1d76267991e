//! Inverse kinematics boundary
//!
//! Numerical IK is external. Solvers are pure: they return joint positions
//! for the arm's movable joints, or `None` when no solution was found.

use nalgebra::{DVector, Isometry3};

/// End-effector inverse kinematics oracle
pub trait InverseKinematics {
    /// Solve for joint positions placing the gripper frame at `target`
    ///
    /// # Arguments
    /// * `target` - Desired world pose of the gripper frame
    /// * `initial_guess` - Seed for the solve, typically the previous solution
    fn solve(
        &self,
        target: &Isometry3<f64>,
        initial_guess: Option<&DVector<f64>>,
    ) -> Option<DVector<f64>>;
}

impl<F> InverseKinematics for F
where
    F: Fn(&Isometry3<f64>, Option<&DVector<f64>>) -> Option<DVector<f64>>,
{
    fn solve(
        &self,
        target: &Isometry3<f64>,
        initial_guess: Option<&DVector<f64>>,
    ) -> Option<DVector<f64>> {
        self(target, initial_guess)
    }
}
