//! Bounding-box placement sampling
//!
//! Samples poses that rest one box on top of another. Poses are expressed in
//! the supporting surface's body frame; callers compose them with the
//! surface's world pose.

use nalgebra::{Isometry3, Vector2};
use rand::Rng;

use super::aabb::BoundingBox;

/// Default clearance between the object bottom and the surface top [m]
pub const DEFAULT_Z_EPSILON: f64 = 1e-3;

/// Height of the object's body origin that makes its box rest on the surface
///
/// z = top(surface) - bottom(object) + z_epsilon
pub fn aabb_z_placement(object: &BoundingBox, surface: &BoundingBox, z_epsilon: f64) -> f64 {
    surface.max().z - object.min().z + z_epsilon
}

/// Infinite sampler of stable placements of `object` on `surface`
///
/// The object's box center is drawn uniformly from the surface footprint
/// shrunk by the object's half extents, so the whole object footprint stays
/// on the surface. Along an axis where the object is wider than the surface
/// the range collapses to the surface center.
#[derive(Debug, Clone)]
pub struct PlacementSampler<R> {
    lower: Vector2<f64>,
    upper: Vector2<f64>,
    /// Offset from the body origin to the box center (xy)
    center_offset: Vector2<f64>,
    z: f64,
    rng: R,
}

impl<R: Rng> PlacementSampler<R> {
    /// Create a sampler for `object` resting on `surface`
    pub fn new(object: &BoundingBox, surface: &BoundingBox, z_epsilon: f64, rng: R) -> Self {
        let surface_center = surface.center.xy();
        let slack = (surface.extent.xy() - object.extent.xy()).map(|s| s.max(0.0));

        Self {
            lower: surface_center - slack,
            upper: surface_center + slack,
            center_offset: object.center.xy(),
            z: aabb_z_placement(object, surface, z_epsilon),
            rng,
        }
    }

    /// Sample range of the object's box center in the surface frame
    pub fn bounds(&self) -> (Vector2<f64>, Vector2<f64>) {
        (self.lower, self.upper)
    }

    fn sample_axis(&mut self, axis: usize) -> f64 {
        let (lo, hi) = (self.lower[axis], self.upper[axis]);
        if hi > lo {
            self.rng.gen_range(lo..=hi)
        } else {
            lo
        }
    }
}

impl<R: Rng> Iterator for PlacementSampler<R> {
    type Item = Isometry3<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        let x = self.sample_axis(0);
        let y = self.sample_axis(1);
        // Shift so the box center (not the body origin) lands on the sample
        Some(Isometry3::translation(
            x - self.center_offset.x,
            y - self.center_offset.y,
            self.z,
        ))
    }
}

/// Convenience constructor with the default clearance
pub fn sample_aabb_placement<R: Rng>(
    object: &BoundingBox,
    surface: &BoundingBox,
    rng: R,
) -> PlacementSampler<R> {
    PlacementSampler::new(object, surface, DEFAULT_Z_EPSILON, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn table() -> BoundingBox {
        BoundingBox::new(Vector3::new(0.0, 0.0, 0.736), Vector3::new(0.356, 0.381, 0.0285))
    }

    fn broccoli() -> BoundingBox {
        BoundingBox::new(Vector3::new(0.0, 0.0, 0.05), Vector3::new(0.025, 0.025, 0.05))
    }

    #[test]
    fn test_z_placement_rests_on_top() {
        let z = aabb_z_placement(&broccoli(), &table(), 0.0);
        // Table top 0.7645, broccoli bottom at body z = 0.0
        assert_relative_eq!(z, 0.7645, epsilon = 1e-12);
    }

    #[test]
    fn test_samples_within_footprint() {
        let sampler = sample_aabb_placement(&broccoli(), &table(), StdRng::seed_from_u64(7));

        for pose in sampler.take(500) {
            let t = pose.translation.vector;
            assert!(t.x.abs() <= 0.356 - 0.025 + 1e-12, "x = {}", t.x);
            assert!(t.y.abs() <= 0.381 - 0.025 + 1e-12, "y = {}", t.y);
            assert_relative_eq!(t.z, 0.7645 + DEFAULT_Z_EPSILON, epsilon = 1e-12);
            assert_relative_eq!(pose.rotation.angle(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_offset_box_center_lands_in_range() {
        let object = BoundingBox::new(Vector3::new(0.01, -0.02, 0.05), Vector3::new(0.02, 0.02, 0.05));
        let sampler = PlacementSampler::new(&object, &table(), 0.0, StdRng::seed_from_u64(3));
        let (lower, upper) = sampler.bounds();

        for pose in sampler.take(200) {
            let center = pose.translation.vector.xy() + object.center.xy();
            assert!(center.x >= lower.x && center.x <= upper.x);
            assert!(center.y >= lower.y && center.y <= upper.y);
        }
    }

    #[test]
    fn test_wide_object_collapses_to_center() {
        // Object wider than the surface along both axes
        let surface = BoundingBox::new(Vector3::new(0.1, 0.2, 0.025), Vector3::new(0.0125, 0.0125, 0.025));
        let mut sampler = sample_aabb_placement(&broccoli(), &surface, StdRng::seed_from_u64(1));

        let pose = sampler.next().unwrap();
        assert_relative_eq!(pose.translation.vector.x, 0.1, epsilon = 1e-12);
        assert_relative_eq!(pose.translation.vector.y, 0.2, epsilon = 1e-12);
    }
}
