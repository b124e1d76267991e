//! Waypoint trajectories with attached bodies
//!
//! A trajectory is an ordered, non-empty path of waypoints. Adjacent
//! waypoints are assumed reachable by direct interpolation. Attachments are
//! relative poses re-evaluated after every waypoint so that held bodies stay
//! rigid relative to the gripper.

use std::fmt;
use std::sync::Arc;

use super::{Configuration, Joints, ModelError, RelativePose};
use crate::context::{ContextError, PhysicalContext};
use crate::math::pose_distance;

/// A single trajectory waypoint
#[derive(Debug, Clone, PartialEq)]
pub enum Waypoint {
    Configuration(Configuration),
    Pose(RelativePose),
}

impl Waypoint {
    /// Write the waypoint into the context
    pub fn assign<C>(&self, context: &mut C) -> Result<(), ContextError>
    where
        C: PhysicalContext + ?Sized,
    {
        match self {
            Waypoint::Configuration(conf) => conf.assign(context),
            Waypoint::Pose(pose) => pose.assign(context),
        }
    }

    pub fn as_configuration(&self) -> Option<&Configuration> {
        match self {
            Waypoint::Configuration(conf) => Some(conf),
            Waypoint::Pose(_) => None,
        }
    }

    /// Gap between two waypoints of the same kind
    ///
    /// Configurations: largest per-joint difference. Poses with the same
    /// parent and child: larger of translation distance and rotation angle.
    /// `None` when the waypoints are not comparable.
    pub fn distance(&self, other: &Waypoint) -> Option<f64> {
        match (self, other) {
            (Waypoint::Configuration(a), Waypoint::Configuration(b)) => a.max_joint_distance(b),
            (Waypoint::Pose(a), Waypoint::Pose(b))
                if a.parent() == b.parent() && a.child() == b.child() =>
            {
                Some(pose_distance(a.transform(), b.transform()))
            }
            _ => None,
        }
    }
}

impl From<Configuration> for Waypoint {
    fn from(conf: Configuration) -> Self {
        Waypoint::Configuration(conf)
    }
}

impl From<RelativePose> for Waypoint {
    fn from(pose: RelativePose) -> Self {
        Waypoint::Pose(pose)
    }
}

/// Ordered path of waypoints plus attached bodies
///
/// The path is shared: re-attaching or detaching bodies does not copy it.
#[derive(Clone, PartialEq)]
pub struct Trajectory {
    path: Arc<[Waypoint]>,
    attachments: Vec<RelativePose>,
}

impl Trajectory {
    /// Create a trajectory; the path must be non-empty
    pub fn new<I>(path: I, attachments: Vec<RelativePose>) -> Result<Self, ModelError>
    where
        I: IntoIterator,
        I::Item: Into<Waypoint>,
    {
        let path: Arc<[Waypoint]> = path.into_iter().map(Into::into).collect();
        if path.is_empty() {
            return Err(ModelError::EmptyPath);
        }
        Ok(Self { path, attachments })
    }

    /// Trajectory without attachments
    pub fn from_path<I>(path: I) -> Result<Self, ModelError>
    where
        I: IntoIterator,
        I::Item: Into<Waypoint>,
    {
        Self::new(path, Vec::new())
    }

    pub fn path(&self) -> &[Waypoint] {
        &self.path
    }

    pub fn attachments(&self) -> &[RelativePose] {
        &self.attachments
    }

    /// Number of waypoints (always at least one)
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn first(&self) -> &Waypoint {
        &self.path[0]
    }

    pub fn last(&self) -> &Waypoint {
        &self.path[self.path.len() - 1]
    }

    /// Joints of the first waypoint, if it is a configuration
    pub fn joints(&self) -> Option<&Joints> {
        self.first().as_configuration().map(Configuration::joints)
    }

    /// Number of joints the path moves, if it is a joint-space path
    pub fn joint_count(&self) -> Option<usize> {
        self.joints().map(|joints| joints.len())
    }

    /// Same path in reverse order; attachments are kept
    pub fn reverse(&self) -> Self {
        Self {
            path: self.path.iter().rev().cloned().collect(),
            attachments: self.attachments.clone(),
        }
    }

    /// Same path with the given attachments
    pub fn with_attachments(&self, attachments: Vec<RelativePose>) -> Self {
        Self {
            path: Arc::clone(&self.path),
            attachments,
        }
    }

    /// Same path with no attachments
    pub fn detached(&self) -> Self {
        self.with_attachments(Vec::new())
    }

    /// Step through the path, assigning into `context`
    ///
    /// The first waypoint is taken to be the current state and is skipped.
    /// After each waypoint every attachment is re-assigned in declaration
    /// order. Yields the index of the waypoint just assigned.
    pub fn iterate<'a, C>(&'a self, context: &'a mut C) -> TrajectoryPlayback<'a, C>
    where
        C: PhysicalContext + ?Sized,
    {
        TrajectoryPlayback {
            trajectory: self,
            context,
            index: 1,
        }
    }
}

impl fmt::Debug for Trajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trajectory(waypoints: {}, attachments: {})",
            self.path.len(),
            self.attachments.len()
        )
    }
}

fn assign_step<C>(
    context: &mut C,
    trajectory: &Trajectory,
    waypoint: &Waypoint,
) -> Result<(), ContextError>
where
    C: PhysicalContext + ?Sized,
{
    waypoint.assign(context)?;
    // TODO: order attachments topologically once bodies can be stacked
    for attachment in &trajectory.attachments {
        attachment.assign(context)?;
    }
    Ok(())
}

/// Iterator returned by [`Trajectory::iterate`]
pub struct TrajectoryPlayback<'a, C: ?Sized> {
    trajectory: &'a Trajectory,
    context: &'a mut C,
    index: usize,
}

impl<'a, C> TrajectoryPlayback<'a, C>
where
    C: PhysicalContext + ?Sized,
{
    /// Read-only view of the context between steps
    pub fn context(&self) -> &C {
        self.context
    }
}

impl<'a, C> Iterator for TrajectoryPlayback<'a, C>
where
    C: PhysicalContext + ?Sized,
{
    type Item = Result<usize, ContextError>;

    fn next(&mut self) -> Option<Self::Item> {
        let trajectory = self.trajectory;
        let waypoint = trajectory.path.get(self.index)?;
        let index = self.index;
        self.index += 1;

        Some(assign_step(&mut *self.context, trajectory, waypoint).map(|()| index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.trajectory.path.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::WorldState;
    use crate::model::{joint_ids, FrameId};
    use approx::assert_relative_eq;
    use nalgebra::{DVector, Isometry3};

    fn line(joints: &Joints, values: &[f64]) -> Trajectory {
        Trajectory::from_path(
            values
                .iter()
                .map(|&v| Configuration::from_slice(joints.clone(), &[v]).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_path_rejected() {
        let result = Trajectory::from_path(Vec::<Configuration>::new());
        assert_eq!(result.unwrap_err(), ModelError::EmptyPath);
    }

    #[test]
    fn test_double_reverse_is_identity() {
        let joints = joint_ids(["a"]);
        let traj = line(&joints, &[0.0, 0.1, 0.25, 0.5]);

        let reversed = traj.reverse();
        assert_eq!(reversed.first(), traj.last());
        assert_eq!(reversed.reverse().path(), traj.path());
    }

    #[test]
    fn test_reverse_keeps_attachments() {
        let joints = joint_ids(["a"]);
        let grasp = RelativePose::new(FrameId::body("gripper"), "cup", Isometry3::identity());
        let traj = line(&joints, &[0.0, 1.0]).with_attachments(vec![grasp.clone()]);

        assert_eq!(traj.reverse().attachments(), &[grasp]);
        assert!(traj.detached().attachments().is_empty());
    }

    #[test]
    fn test_iterate_skips_start_and_tracks_attachment() {
        let joints = joint_ids(["slide"]);
        let mut world = WorldState::new();
        world.add_joints(&joints, &DVector::zeros(1));
        world.link_frame("gripper", joints.clone(), |q| Isometry3::translation(q[0], 0.0, 0.0));
        world.add_body("cup", Isometry3::identity());

        let grasp = RelativePose::new(FrameId::body("gripper"), "cup", Isometry3::translation(0.0, 0.0, 0.1));
        let traj = line(&joints, &[0.0, 0.1, 0.2, 0.3]).with_attachments(vec![grasp]);

        let mut visited = Vec::new();
        let mut playback = traj.iterate(&mut world);
        while let Some(step) = playback.next() {
            let index = step.unwrap();
            let cup = playback.context().frame_pose(&FrameId::body("cup")).unwrap();
            assert_relative_eq!(cup.translation.vector.x, 0.1 * index as f64, epsilon = 1e-12);
            visited.push(index);
        }

        assert_eq!(visited, vec![1, 2, 3]);
    }

    #[test]
    fn test_joint_count() {
        let joints = joint_ids(["a", "b"]);
        let q = Configuration::from_slice(joints, &[0.0, 0.0]).unwrap();
        let traj = Trajectory::from_path([q]).unwrap();
        assert_eq!(traj.joint_count(), Some(2));

        let pose = RelativePose::in_world("cup", Isometry3::identity());
        let traj = Trajectory::from_path([pose]).unwrap();
        assert_eq!(traj.joint_count(), None);
    }
}
