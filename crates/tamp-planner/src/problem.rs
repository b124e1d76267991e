//! Task planner boundary
//!
//! Builds the planning problem handed to the symbolic planner: domain and
//! stream descriptions, initial facts, goal, and the stream generators that
//! back each stream name. The planner's search strategy is external and sits
//! behind [`TaskPlanner`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use tamp_core::{Configuration, InverseKinematics, JointInterpolator, ModelError, RelativePose};

use crate::config::BridgeConfig;
use crate::scene::Scene;
use crate::streams::{
    seeded_rng, ApproachIk, FreeMotion, HoldingMotion, StablePlacement, StreamError, StreamMap,
    TopGraspSampler,
};
use crate::value::Value;

/// Domain description shipped with the crate
pub const DOMAIN_PDDL: &str = include_str!("../pddl/domain.pddl");

/// Stream description shipped with the crate
pub const STREAM_PDDL: &str = include_str!("../pddl/stream.pddl");

/// Stream names, as declared in [`STREAM_PDDL`]
pub const SAMPLE_POSE: &str = "sample-pose";
pub const SAMPLE_GRASP: &str = "sample-grasp";
pub const INVERSE_KINEMATICS: &str = "inverse-kinematics";
pub const PLAN_FREE_MOTION: &str = "plan-free-motion";
pub const PLAN_HOLDING_MOTION: &str = "plan-holding-motion";

/// Problem construction errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProblemError {
    #[error("Problem needs at least one movable object")]
    NoMovableObjects,
    #[error("Object not in scene: {0}")]
    UnknownObject(String),
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

/// Errors reported by a task planner
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),
    #[error("Planner failed: {0}")]
    Failed(String),
}

/// Ground atom
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    pub predicate: String,
    pub args: Vec<Value>,
}

impl Fact {
    pub fn new(predicate: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            predicate: predicate.into(),
            args,
        }
    }

    /// Atom without arguments
    pub fn nullary(predicate: impl Into<String>) -> Self {
        Self::new(predicate, Vec::new())
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.predicate)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        write!(f, ")")
    }
}

/// Goal formula
#[derive(Debug, Clone, PartialEq)]
pub enum Goal {
    Fact(Fact),
    And(Vec<Goal>),
}

impl Goal {
    /// Conjunction of atoms
    pub fn all(facts: impl IntoIterator<Item = Fact>) -> Self {
        Goal::And(facts.into_iter().map(Goal::Fact).collect())
    }

    /// Atoms of the formula, in order
    pub fn facts(&self) -> Vec<&Fact> {
        match self {
            Goal::Fact(fact) => vec![fact],
            Goal::And(goals) => goals.iter().flat_map(Goal::facts).collect(),
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Goal::Fact(fact) => write!(f, "{}", fact),
            Goal::And(goals) => {
                write!(f, "(and")?;
                for goal in goals {
                    write!(f, " {}", goal)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Everything the task planner needs
#[derive(Debug)]
pub struct Problem {
    pub domain_pddl: String,
    pub stream_pddl: String,
    pub constant_map: BTreeMap<String, Value>,
    pub init: Vec<Fact>,
    pub goal: Goal,
    pub stream_map: StreamMap,
}

/// Action as returned by the planner
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolicAction {
    pub name: String,
    pub args: Vec<Value>,
}

impl SymbolicAction {
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Planner result; `plan` is `None` when no plan was found
#[derive(Debug, Clone, Default)]
pub struct Solution {
    pub plan: Option<Vec<SymbolicAction>>,
    pub cost: f64,
    pub evaluations: Vec<Fact>,
}

/// Symbolic planner that searches over facts and calls streams on demand
pub trait TaskPlanner {
    fn solve(&mut self, problem: &mut Problem) -> Result<Solution, PlannerError>;
}

/// Builds the kitchen problem from a scene and the robot's start configuration
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    scene: Arc<Scene>,
    initial_conf: Configuration,
    movable: Vec<String>,
    surfaces: Vec<String>,
    config: BridgeConfig,
}

impl ProblemBuilder {
    pub fn new(scene: Arc<Scene>, initial_conf: Configuration, config: BridgeConfig) -> Self {
        Self {
            scene,
            initial_conf,
            movable: Vec::new(),
            surfaces: Vec::new(),
            config,
        }
    }

    /// Add an object the robot may pick up; the first one must end up cooked
    pub fn movable(mut self, name: impl Into<String>) -> Self {
        self.movable.push(name.into());
        self
    }

    /// Add a surface objects may be placed on
    pub fn surface(mut self, name: impl Into<String>) -> Self {
        self.surfaces.push(name.into());
        self
    }

    fn check_known(&self, name: &str) -> Result<(), ProblemError> {
        if self.scene.aabb(name).is_none() || self.scene.world_pose(name).is_none() {
            return Err(ProblemError::UnknownObject(name.to_string()));
        }
        Ok(())
    }

    /// Initial facts
    ///
    /// `CanMove`, `Conf q0`, `AtConf q0`, `HandEmpty`; per movable object
    /// `Graspable`, `Pose`, `AtPose`, and `Stackable` on every surface; `Sink`
    /// and `Stove` for surfaces whose name contains that word.
    pub fn initial_facts(&self) -> Result<Vec<Fact>, ProblemError> {
        let conf = Value::Conf(self.initial_conf.clone());
        let mut init = vec![
            Fact::nullary("CanMove"),
            Fact::new("Conf", vec![conf.clone()]),
            Fact::new("AtConf", vec![conf]),
            Fact::nullary("HandEmpty"),
        ];

        for object in &self.movable {
            self.check_known(object)?;
            let world_pose = self
                .scene
                .world_pose(object)
                .ok_or_else(|| ProblemError::UnknownObject(object.clone()))?;
            let pose = Value::Pose(RelativePose::in_world(object.clone(), *world_pose));

            init.push(Fact::new("Graspable", vec![Value::object(object.as_str())]));
            init.push(Fact::new("Pose", vec![Value::object(object.as_str()), pose.clone()]));
            init.push(Fact::new("AtPose", vec![Value::object(object.as_str()), pose]));
            for surface in &self.surfaces {
                init.push(Fact::new(
                    "Stackable",
                    vec![Value::object(object.as_str()), Value::object(surface.as_str())],
                ));
            }
        }

        for surface in &self.surfaces {
            self.check_known(surface)?;
            if surface.contains("sink") {
                init.push(Fact::new("Sink", vec![Value::object(surface.as_str())]));
            }
            if surface.contains("stove") {
                init.push(Fact::new("Stove", vec![Value::object(surface.as_str())]));
            }
        }
        Ok(init)
    }

    /// Return to the start configuration with the first movable object cooked
    pub fn goal(&self) -> Result<Goal, ProblemError> {
        let object = self.movable.first().ok_or(ProblemError::NoMovableObjects)?;
        Ok(Goal::all([
            Fact::new("AtConf", vec![Value::Conf(self.initial_conf.clone())]),
            Fact::new("Cooked", vec![Value::object(object.as_str())]),
        ]))
    }

    /// Stream generators for every stream in [`STREAM_PDDL`]
    ///
    /// Each sampling stream gets its own RNG derived from the configured seed.
    pub fn stream_map<S>(&self, solver: S) -> Result<StreamMap, ProblemError>
    where
        S: InverseKinematics + 'static,
    {
        let arm_joints = self.initial_conf.joints().clone();
        let interpolator = JointInterpolator::uniform(arm_joints.clone(), self.config.interpolation.resolution)?;
        let seed = |offset: u64| self.config.seed.map(|seed| seed.wrapping_add(offset));

        let mut streams = StreamMap::new();
        streams.insert(
            SAMPLE_POSE,
            StablePlacement::new(self.scene.clone(), &self.config.placement, seeded_rng(seed(0))),
        );
        streams.insert(
            SAMPLE_GRASP,
            TopGraspSampler::new(self.scene.clone(), &self.config.grasp, seeded_rng(seed(1))),
        );
        streams.insert(
            INVERSE_KINEMATICS,
            ApproachIk::new(solver, arm_joints, &self.config.approach)?,
        );
        streams.insert(PLAN_FREE_MOTION, FreeMotion::new(interpolator.clone()));
        streams.insert(PLAN_HOLDING_MOTION, HoldingMotion::new(interpolator));
        Ok(streams)
    }

    /// Assemble the full problem
    pub fn build<S>(&self, solver: S) -> Result<Problem, ProblemError>
    where
        S: InverseKinematics + 'static,
    {
        let init = self.initial_facts()?;
        let goal = self.goal()?;
        let stream_map = self.stream_map(solver)?;
        log::info!("Built problem with {} initial facts, goal {}", init.len(), goal);

        Ok(Problem {
            domain_pddl: DOMAIN_PDDL.to_string(),
            stream_pddl: STREAM_PDDL.to_string(),
            constant_map: BTreeMap::new(),
            init,
            goal,
            stream_map,
        })
    }
}
