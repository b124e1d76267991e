//! Bridge configuration
//!
//! Tunable parameters for the stream generators, plan postprocessing and
//! breakpoint conversion. Defaults reproduce the kitchen demo.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use tamp_core::geometry::DEFAULT_Z_EPSILON;
use tamp_core::DEFAULT_RESOLUTION;

/// Main bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Joint-space interpolation
    pub interpolation: InterpolationConfig,
    /// Stable placement sampling
    pub placement: PlacementConfig,
    /// Top grasp sampling
    pub grasp: GraspConfig,
    /// Straight-line approach for inverse kinematics
    pub approach: ApproachConfig,
    /// Trajectory to breakpoint conversion
    pub conversion: ConversionConfig,
    /// Largest allowed gap between consecutive arm segments [rad]
    pub continuity_tolerance: f64,
    /// Seed for every sampling generator; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            interpolation: InterpolationConfig::default(),
            placement: PlacementConfig::default(),
            grasp: GraspConfig::default(),
            approach: ApproachConfig::default(),
            conversion: ConversionConfig::default(),
            continuity_tolerance: 1e-6,
            seed: None,
        }
    }
}

/// Joint-space interpolation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterpolationConfig {
    /// Largest per-joint step between consecutive waypoints [rad or m]
    pub resolution: f64,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

/// Placement sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Clearance between object bottom and surface top [m]
    pub z_epsilon: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            z_epsilon: DEFAULT_Z_EPSILON,
        }
    }
}

/// Top cylinder grasp configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraspConfig {
    /// Distance from the gripper frame to the grasp point along the tool axis [m]
    pub tool_offset: f64,
    /// How far below the object top the fingers close [m]
    pub grasp_length: f64,
    /// Widest footprint the gripper can close around [m]; `None` is unbounded
    pub max_width: Option<f64>,
}

impl Default for GraspConfig {
    fn default() -> Self {
        Self {
            tool_offset: 0.1,
            grasp_length: 0.0,
            max_width: None,
        }
    }
}

/// Approach motion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproachConfig {
    /// Length of the straight-line approach [m]
    pub distance: f64,
    /// Spacing between IK solves along the approach [m]
    pub step_size: f64,
    /// Approach direction in the grasp frame; normalized before use
    pub direction: Vector3<f64>,
}

impl Default for ApproachConfig {
    fn default() -> Self {
        Self {
            distance: 0.1,
            step_size: 0.01,
            direction: Vector3::new(0.0, -1.0, 0.0),
        }
    }
}

impl ApproachConfig {
    /// Offsets along the approach at which IK is solved
    ///
    /// 0, step, 2·step, ... strictly below `distance`, then `distance` itself.
    pub fn offsets(&self) -> Vec<f64> {
        let mut offsets = Vec::new();
        if self.step_size > 0.0 {
            let mut i = 0usize;
            loop {
                let t = i as f64 * self.step_size;
                // Guard against 0.1 / 0.01 landing just below an integer
                if t >= self.distance - 1e-9 * self.step_size {
                    break;
                }
                offsets.push(t);
                i += 1;
            }
        }
        offsets.push(self.distance);
        offsets
    }
}

/// Breakpoint conversion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Duration of every emitted segment [s]
    pub segment_duration: f64,
    /// Pause added after each segment when computing total duration [s]
    pub segment_padding: f64,
    /// Settling time appended to the total duration [s]
    pub settle_time: f64,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            segment_duration: 1.0,
            segment_padding: 0.5,
            settle_time: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_relative_eq!(config.approach.distance, 0.1);
        assert_relative_eq!(config.approach.step_size, 0.01);
        assert_relative_eq!(config.placement.z_epsilon, 1e-3);
        assert!(config.grasp.max_width.is_none());
    }

    #[test]
    fn test_default_approach_offsets() {
        let offsets = ApproachConfig::default().offsets();

        assert_eq!(offsets.len(), 11);
        assert_relative_eq!(offsets[0], 0.0);
        assert_relative_eq!(offsets[9], 0.09, epsilon = 1e-12);
        assert_relative_eq!(offsets[10], 0.1);
    }

    #[test]
    fn test_uneven_approach_offsets() {
        let config = ApproachConfig {
            distance: 0.25,
            step_size: 0.1,
            ..Default::default()
        };

        assert_eq!(config.offsets(), vec![0.0, 0.1, 0.2, 0.25]);
    }

    #[test]
    fn test_zero_distance_single_solve() {
        let config = ApproachConfig {
            distance: 0.0,
            ..Default::default()
        };

        assert_eq!(config.offsets(), vec![0.0]);
    }
}
