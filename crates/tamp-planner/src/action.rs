//! Typed plan actions
//!
//! The task planner returns actions as a name plus positional arguments.
//! Decoding them into a closed enum up front means the postprocessor never
//! looks at argument positions.

use thiserror::Error;

use tamp_core::{Configuration, RelativePose, Trajectory};

use crate::value::{Value, ValueKind};

/// Action decoding errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActionError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),
    #[error("Action {action} expects {expected} arguments, got {got}")]
    Arity {
        action: String,
        expected: usize,
        got: usize,
    },
    #[error("Action {action} argument {index}: expected {expected}, got {got}")]
    ArgumentKind {
        action: String,
        index: usize,
        expected: ValueKind,
        got: ValueKind,
    },
}

/// A plan step with decoded arguments
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Move the arm with an empty hand
    Move {
        q1: Configuration,
        q2: Configuration,
        traj: Trajectory,
    },
    /// Move the arm while holding `object`
    MoveHolding {
        q1: Configuration,
        q2: Configuration,
        object: String,
        grasp: RelativePose,
        traj: Trajectory,
    },
    /// Grasp `object` at `pose`; `traj` runs from the grasp to the pre-grasp `conf`
    Pick {
        object: String,
        pose: RelativePose,
        grasp: RelativePose,
        conf: Configuration,
        traj: Trajectory,
    },
    /// Release `object` at `pose`; `traj` as for [`Action::Pick`]
    Place {
        object: String,
        pose: RelativePose,
        grasp: RelativePose,
        conf: Configuration,
        traj: Trajectory,
    },
    /// Symbolic only
    Clean { object: String, surface: String },
    /// Symbolic only
    Cook { object: String, surface: String },
}

/// Positional argument reader for one action
struct Args<'a> {
    action: &'a str,
    args: &'a [Value],
}

impl<'a> Args<'a> {
    fn new(action: &'a str, args: &'a [Value], expected: usize) -> Result<Self, ActionError> {
        if args.len() != expected {
            return Err(ActionError::Arity {
                action: action.to_string(),
                expected,
                got: args.len(),
            });
        }
        Ok(Self { action, args })
    }

    fn kind_error(&self, index: usize, expected: ValueKind) -> ActionError {
        ActionError::ArgumentKind {
            action: self.action.to_string(),
            index,
            expected,
            got: self.args[index].kind(),
        }
    }

    fn object(&self, index: usize) -> Result<String, ActionError> {
        self.args[index]
            .as_object()
            .map(str::to_string)
            .ok_or_else(|| self.kind_error(index, ValueKind::Object))
    }

    fn pose(&self, index: usize) -> Result<RelativePose, ActionError> {
        self.args[index]
            .as_pose()
            .cloned()
            .ok_or_else(|| self.kind_error(index, ValueKind::Pose))
    }

    fn grasp(&self, index: usize) -> Result<RelativePose, ActionError> {
        self.args[index]
            .as_grasp()
            .cloned()
            .ok_or_else(|| self.kind_error(index, ValueKind::Grasp))
    }

    fn conf(&self, index: usize) -> Result<Configuration, ActionError> {
        self.args[index]
            .as_conf()
            .cloned()
            .ok_or_else(|| self.kind_error(index, ValueKind::Conf))
    }

    fn traj(&self, index: usize) -> Result<Trajectory, ActionError> {
        self.args[index]
            .as_traj()
            .cloned()
            .ok_or_else(|| self.kind_error(index, ValueKind::Traj))
    }
}

impl Action {
    /// Decode a planner action
    ///
    /// Accepted names: `move` (alias `move_free`), `move_holding`, `pick`,
    /// `place`, `clean`, `cook`.
    pub fn from_symbolic(name: &str, args: &[Value]) -> Result<Self, ActionError> {
        let action = match name {
            "move" | "move_free" => {
                let a = Args::new(name, args, 3)?;
                Action::Move {
                    q1: a.conf(0)?,
                    q2: a.conf(1)?,
                    traj: a.traj(2)?,
                }
            }
            "move_holding" => {
                let a = Args::new(name, args, 5)?;
                Action::MoveHolding {
                    q1: a.conf(0)?,
                    q2: a.conf(1)?,
                    object: a.object(2)?,
                    grasp: a.grasp(3)?,
                    traj: a.traj(4)?,
                }
            }
            "pick" | "place" => {
                let a = Args::new(name, args, 5)?;
                let (object, pose, grasp, conf, traj) =
                    (a.object(0)?, a.pose(1)?, a.grasp(2)?, a.conf(3)?, a.traj(4)?);
                if name == "pick" {
                    Action::Pick { object, pose, grasp, conf, traj }
                } else {
                    Action::Place { object, pose, grasp, conf, traj }
                }
            }
            "clean" | "cook" => {
                let a = Args::new(name, args, 2)?;
                let (object, surface) = (a.object(0)?, a.object(1)?);
                if name == "clean" {
                    Action::Clean { object, surface }
                } else {
                    Action::Cook { object, surface }
                }
            }
            _ => return Err(ActionError::UnknownAction(name.to_string())),
        };
        Ok(action)
    }

    /// Canonical action name
    pub fn name(&self) -> &'static str {
        match self {
            Action::Move { .. } => "move",
            Action::MoveHolding { .. } => "move_holding",
            Action::Pick { .. } => "pick",
            Action::Place { .. } => "place",
            Action::Clean { .. } => "clean",
            Action::Cook { .. } => "cook",
        }
    }
}
