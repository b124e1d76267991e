//! Axis-aligned bounding boxes
//!
//! Coarse object extents used for placement sampling and grasp-width
//! reasoning. Not used for collision checking.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in a body's local frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Box center [m]
    pub center: Vector3<f64>,
    /// Half extents along x, y, z [m]
    pub extent: Vector3<f64>,
}

impl BoundingBox {
    /// Create a box from its center and half extents
    pub fn new(center: Vector3<f64>, extent: Vector3<f64>) -> Self {
        Self { center, extent }
    }

    /// Create a box from its center and full side lengths
    pub fn from_size(center: Vector3<f64>, size: Vector3<f64>) -> Self {
        Self {
            center,
            extent: size / 2.0,
        }
    }

    /// Minimum corner
    pub fn min(&self) -> Vector3<f64> {
        self.center - self.extent
    }

    /// Maximum corner
    pub fn max(&self) -> Vector3<f64> {
        self.center + self.extent
    }

    /// Full side lengths (w, l, h)
    pub fn size(&self) -> Vector3<f64> {
        2.0 * self.extent
    }

    /// Diameter of the footprint, treating the box as an upright cylinder
    ///
    /// Mean of the x and y side lengths.
    pub fn footprint_diameter(&self) -> f64 {
        let size = self.size();
        (size.x + size.y) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_size_halves() {
        let aabb = BoundingBox::from_size(Vector3::new(0.0, 0.0, 0.736), Vector3::new(0.7122, 0.762, 0.057));

        assert_relative_eq!(aabb.extent, Vector3::new(0.3561, 0.381, 0.0285), epsilon = 1e-12);
        assert_relative_eq!(aabb.max().z, 0.7645, epsilon = 1e-12);
        assert_relative_eq!(aabb.min().z, 0.7075, epsilon = 1e-12);
    }

    #[test]
    fn test_footprint_diameter() {
        let aabb = BoundingBox::new(Vector3::zeros(), Vector3::new(0.025, 0.035, 0.05));
        assert_relative_eq!(aabb.footprint_diameter(), 0.06, epsilon = 1e-12);
    }
}
