//! TAMP Planner
//!
//! Bridges a symbolic task planner with continuous robot motion.
//!
//! # Architecture
//!
//! ```text
//! scene + start conf ──► ProblemBuilder ──► Problem ──► TaskPlanner (external)
//!                                              │              │
//!                                       stream generators   plan
//!                                                             │
//!      segments + gripper setpoints ◄── convert ◄── postprocess ◄── decode
//! ```
//!
//! The task planner searches over facts and calls the stream generators on
//! demand; every stream output is a candidate the planner may discard.
//!
//! # Components
//!
//! - [`config`]: Bridge configuration
//! - [`scene`]: Object extents and captured poses
//! - [`value`]: Values exchanged with the planner
//! - [`streams`]: Placement, grasp, inverse kinematics, and motion streams
//! - [`problem`]: Facts, goal, and the task planner boundary
//! - [`action`]: Decoded plan actions
//! - [`postprocess`]: Plan to trajectory expansion
//! - [`convert`]: Trajectory to breakpoint conversion
//! - [`playback`]: Kinematic replay
//! - [`pipeline`]: End-to-end execution
//! - [`scenarios`]: Kitchen pick-and-cook scenario

pub mod config;
pub mod scene;
pub mod value;
pub mod streams;
pub mod problem;
pub mod action;
pub mod postprocess;
pub mod convert;
pub mod playback;
pub mod pipeline;
pub mod scenarios;

// Re-exports
pub use action::{Action, ActionError};
pub use config::BridgeConfig;
pub use convert::{compute_duration, BreakpointConverter, Conversion, ConversionError, MotionSegment};
pub use pipeline::{Execution, Pipeline, PipelineError};
pub use playback::step_trajectories;
pub use postprocess::{ContinuityError, PlanPostprocessor};
pub use problem::{Fact, Goal, PlannerError, Problem, ProblemBuilder, Solution, SymbolicAction, TaskPlanner};
pub use scene::Scene;
pub use streams::{StreamError, StreamFn, StreamMap, StreamOutputs};
pub use value::Value;
