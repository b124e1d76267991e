//! Rigid transform utilities
//!
//! Thin helpers over `Isometry3` for building the transforms used by the
//! placement and grasp samplers. Rotations are given as roll-pitch-yaw,
//! composed as R = Rz(yaw) · Ry(pitch) · Rx(roll).

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

/// Build a rigid transform from a translation and roll-pitch-yaw angles
///
/// # Arguments
/// * `translation` - Translation [m]
/// * `rpy` - Roll, pitch, yaw [rad]
pub fn create_transform(translation: Vector3<f64>, rpy: Vector3<f64>) -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::from(translation),
        UnitQuaternion::from_euler_angles(rpy.x, rpy.y, rpy.z),
    )
}

/// Pure translation
pub fn translation(x: f64, y: f64, z: f64) -> Isometry3<f64> {
    Isometry3::translation(x, y, z)
}

/// Pure rotation from roll-pitch-yaw angles [rad]
pub fn rotation_rpy(roll: f64, pitch: f64, yaw: f64) -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::identity(),
        UnitQuaternion::from_euler_angles(roll, pitch, yaw),
    )
}

/// Rotation about the z-axis [rad]
pub fn rotation_z(yaw: f64) -> Isometry3<f64> {
    rotation_rpy(0.0, 0.0, yaw)
}

/// Largest of the translational distance [m] and rotation angle [rad]
/// between two transforms
///
/// Used as a single scalar gap when comparing pose waypoints.
pub fn pose_distance(a: &Isometry3<f64>, b: &Isometry3<f64>) -> f64 {
    let translation = (a.translation.vector - b.translation.vector).norm();
    let angle = a.rotation.angle_to(&b.rotation);
    translation.max(angle)
}
