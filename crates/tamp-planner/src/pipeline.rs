//! End-to-end planning pipeline
//!
//! solve -> decode actions -> postprocess -> continuity check -> convert.
//! A planner that finds no plan is a normal outcome, reported as `Ok(None)`.

use thiserror::Error;

use tamp_core::{ModelError, PhysicalContext, Trajectory};

use crate::action::{Action, ActionError};
use crate::convert::{BreakpointConverter, Conversion, ConversionError};
use crate::postprocess::{ContinuityError, PlanPostprocessor};
use crate::problem::{PlannerError, Problem, SymbolicAction, TaskPlanner};

/// Pipeline errors
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Planner error: {0}")]
    Planner(#[from] PlannerError),
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    #[error("Continuity error: {0}")]
    Continuity(#[from] ContinuityError),
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct Execution {
    /// Decoded plan
    pub actions: Vec<Action>,
    /// Postprocessed trajectories, in execution order
    pub trajectories: Vec<Trajectory>,
    /// Timed segments and gripper setpoints
    pub conversion: Conversion,
    /// Total execution time [s]
    pub duration: f64,
    /// Plan cost reported by the planner
    pub cost: f64,
}

/// Decode every action of a plan
pub fn decode_plan(plan: &[SymbolicAction]) -> Result<Vec<Action>, ActionError> {
    plan.iter()
        .map(|action| Action::from_symbolic(&action.name, &action.args))
        .collect()
}

/// Planner output to controller input
#[derive(Debug, Clone)]
pub struct Pipeline {
    postprocessor: PlanPostprocessor,
    converter: BreakpointConverter,
    continuity_tolerance: f64,
}

impl Pipeline {
    pub fn new(postprocessor: PlanPostprocessor, converter: BreakpointConverter, continuity_tolerance: f64) -> Self {
        Self {
            postprocessor,
            converter,
            continuity_tolerance,
        }
    }

    pub fn postprocessor(&self) -> &PlanPostprocessor {
        &self.postprocessor
    }

    pub fn converter(&self) -> &BreakpointConverter {
        &self.converter
    }

    /// Solve `problem` and turn the plan into executable segments
    ///
    /// Conversion assigns each trajectory's end into `context`, which is left
    /// at the final state of the plan.
    pub fn execute<P, C>(
        &self,
        planner: &mut P,
        problem: &mut Problem,
        context: &mut C,
    ) -> Result<Option<Execution>, PipelineError>
    where
        P: TaskPlanner + ?Sized,
        C: PhysicalContext + ?Sized,
    {
        let solution = planner.solve(problem)?;
        let plan = match solution.plan {
            Some(plan) => plan,
            None => {
                log::warn!("No plan found ({} evaluations)", solution.evaluations.len());
                return Ok(None);
            }
        };
        log::info!("Plan with {} actions, cost {}", plan.len(), solution.cost);

        let actions = decode_plan(&plan)?;
        for (i, action) in actions.iter().enumerate() {
            log::debug!("{}) {}", i + 1, action.name());
        }
        self.process(actions, solution.cost, context).map(Some)
    }

    /// Postprocess, validate, and convert an already decoded plan
    pub fn process<C>(&self, actions: Vec<Action>, cost: f64, context: &mut C) -> Result<Execution, PipelineError>
    where
        C: PhysicalContext + ?Sized,
    {
        let trajectories = self.postprocessor.postprocess(&actions);
        self.postprocessor
            .validate_continuity(&trajectories, self.continuity_tolerance)?;

        let conversion = self.converter.convert(context, &trajectories)?;
        let duration = self.converter.duration(&conversion.segments);
        log::info!(
            "Segments: {}, duration: {} seconds",
            conversion.segments.len(),
            duration
        );

        Ok(Execution {
            actions,
            trajectories,
            conversion,
            duration,
            cost,
        })
    }
}
