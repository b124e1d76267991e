//! Kinematic playback of postprocessed trajectories

use tamp_core::{ContextError, PhysicalContext, Trajectory};

/// Position of a playback step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStep {
    /// Index of the trajectory being played
    pub trajectory: usize,
    /// Index of the waypoint just assigned
    pub waypoint: usize,
}

/// Play every trajectory in order, calling `on_step` after each waypoint
///
/// Attached bodies follow the gripper. Returns the number of steps taken.
pub fn step_trajectories<C, F>(
    context: &mut C,
    trajectories: &[Trajectory],
    mut on_step: F,
) -> Result<usize, ContextError>
where
    C: PhysicalContext + ?Sized,
    F: FnMut(&C, PlaybackStep),
{
    let mut steps = 0;
    for (index, traj) in trajectories.iter().enumerate() {
        let mut playback = traj.iterate(context);
        while let Some(waypoint) = playback.next() {
            let step = PlaybackStep {
                trajectory: index,
                waypoint: waypoint?,
            };
            on_step(playback.context(), step);
            steps += 1;
        }
    }
    log::debug!("Played {} trajectories in {} steps", trajectories.len(), steps);
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{DVector, Isometry3};
    use tamp_core::{joint_ids, Configuration, FrameId, RelativePose, WorldState};

    #[test]
    fn test_steps_skip_first_waypoint() {
        let joints = joint_ids(["slide"]);
        let mut world = WorldState::new();
        world.add_joints(&joints, &DVector::zeros(1));
        world.link_frame("gripper", joints.clone(), |q| Isometry3::translation(q[0], 0.0, 0.0));
        world.add_body("cup", Isometry3::identity());

        let path = |values: &[f64]| {
            values
                .iter()
                .map(|&v| Configuration::from_slice(joints.clone(), &[v]).unwrap())
                .collect::<Vec<_>>()
        };
        let grasp = RelativePose::new(FrameId::body("gripper"), "cup", Isometry3::identity());
        let trajectories = vec![
            Trajectory::from_path(path(&[0.0, 0.1, 0.2])).unwrap(),
            Trajectory::new(path(&[0.2, 0.3]), vec![grasp]).unwrap(),
        ];

        let mut visited = Vec::new();
        let steps = step_trajectories(&mut world, &trajectories, |ctx, step| {
            let cup = ctx.frame_pose(&FrameId::body("cup")).unwrap();
            visited.push((step.trajectory, step.waypoint, cup.translation.vector.x));
        })
        .unwrap();

        assert_eq!(steps, 3);
        assert_eq!((visited[0].0, visited[0].1), (0, 1));
        assert_eq!((visited[2].0, visited[2].1), (1, 1));
        // The cup only follows the gripper while attached
        assert_relative_eq!(visited[1].2, 0.0);
        assert_relative_eq!(visited[2].2, 0.3, epsilon = 1e-12);
    }
}
