//! Stream generators
//!
//! A stream maps input values to a lazy, possibly infinite sequence of output
//! tuples. The task planner pulls as many outputs as it needs and may abandon
//! a stream at any point. Every call is independent: generators own their
//! random state and fork a fresh RNG per call, so returned sequences borrow
//! nothing from the generator.
//!
//! "No solution" is an empty sequence. Errors are reserved for malformed
//! arguments, which indicate a bug in the domain description.

pub mod grasp;
pub mod ik;
pub mod motion;
pub mod placement;

pub use grasp::*;
pub use ik::*;
pub use motion::*;
pub use placement::*;

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use tamp_core::{Configuration, ModelError, RelativePose};

use crate::value::{Value, ValueKind};

/// Lazy sequence of output tuples
pub type StreamOutputs = Box<dyn Iterator<Item = Vec<Value>>>;

/// Stream errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StreamError {
    #[error("Stream {stream} expects {expected} arguments, got {got}")]
    Arity {
        stream: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("Stream {stream} argument {index}: expected {expected}, got {got}")]
    ArgumentKind {
        stream: &'static str,
        index: usize,
        expected: ValueKind,
        got: ValueKind,
    },
    #[error("Unknown object: {0}")]
    UnknownObject(String),
    #[error("Grasp of {grasp} used to hold {object}")]
    GraspMismatch { object: String, grasp: String },
    #[error("Inverse kinematics returned {got} positions for {expected} joints")]
    SolutionDimension { expected: usize, got: usize },
    #[error("Approach direction must be non-zero")]
    DegenerateApproach,
    #[error("Unknown stream: {0}")]
    UnknownStream(String),
    #[error("Model error: {0}")]
    Model(#[from] ModelError),
}

/// A stream generator callable by the task planner
pub trait StreamFn {
    /// Produce the output sequence for one input tuple
    fn call(&mut self, inputs: &[Value]) -> Result<StreamOutputs, StreamError>;
}

/// Named stream generators, keyed by the names used in the stream description
#[derive(Default)]
pub struct StreamMap {
    streams: BTreeMap<String, Box<dyn StreamFn>>,
}

impl StreamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stream, replacing any previous one with the same name
    pub fn insert(&mut self, name: impl Into<String>, stream: impl StreamFn + 'static) {
        self.streams.insert(name.into(), Box::new(stream));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.streams.contains_key(name)
    }

    /// Stream names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.streams.keys().map(String::as_str)
    }

    /// Call a stream by name
    pub fn call(&mut self, name: &str, inputs: &[Value]) -> Result<StreamOutputs, StreamError> {
        let stream = self
            .streams
            .get_mut(name)
            .ok_or_else(|| StreamError::UnknownStream(name.to_string()))?;
        log::debug!("Calling stream {} with {} inputs", name, inputs.len());
        stream.call(inputs)
    }
}

impl std::fmt::Debug for StreamMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.streams.keys()).finish()
    }
}

/// Seeded RNG, or one drawn from entropy when no seed is given
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Independent RNG for one stream call
pub(crate) fn fork_rng(rng: &mut StdRng) -> StdRng {
    StdRng::seed_from_u64(rng.gen())
}

/// Outputs of a function stream: at most one tuple
pub(crate) fn single(outputs: Option<Vec<Value>>) -> StreamOutputs {
    Box::new(outputs.into_iter())
}

pub(crate) fn check_arity(stream: &'static str, inputs: &[Value], expected: usize) -> Result<(), StreamError> {
    if inputs.len() != expected {
        return Err(StreamError::Arity {
            stream,
            expected,
            got: inputs.len(),
        });
    }
    Ok(())
}

fn kind_error(stream: &'static str, index: usize, expected: ValueKind, value: &Value) -> StreamError {
    StreamError::ArgumentKind {
        stream,
        index,
        expected,
        got: value.kind(),
    }
}

pub(crate) fn object_arg<'a>(stream: &'static str, inputs: &'a [Value], index: usize) -> Result<&'a str, StreamError> {
    let value = &inputs[index];
    value
        .as_object()
        .ok_or_else(|| kind_error(stream, index, ValueKind::Object, value))
}

pub(crate) fn pose_arg<'a>(
    stream: &'static str,
    inputs: &'a [Value],
    index: usize,
) -> Result<&'a RelativePose, StreamError> {
    let value = &inputs[index];
    value
        .as_pose()
        .ok_or_else(|| kind_error(stream, index, ValueKind::Pose, value))
}

pub(crate) fn grasp_arg<'a>(
    stream: &'static str,
    inputs: &'a [Value],
    index: usize,
) -> Result<&'a RelativePose, StreamError> {
    let value = &inputs[index];
    value
        .as_grasp()
        .ok_or_else(|| kind_error(stream, index, ValueKind::Grasp, value))
}

pub(crate) fn conf_arg<'a>(
    stream: &'static str,
    inputs: &'a [Value],
    index: usize,
) -> Result<&'a Configuration, StreamError> {
    let value = &inputs[index];
    value
        .as_conf()
        .ok_or_else(|| kind_error(stream, index, ValueKind::Conf, value))
}
