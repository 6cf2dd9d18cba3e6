#![warn(missing_docs)]
//! Core traits and lock-free primitives for asynchronous actor-critic training.
//!
//! Workers interact with an [`Env`], ask an [`ActorCritic`] for actions and
//! gradients, and fold those gradients into one [`SharedParams`] through a
//! [`SharedOptimizer`], all without locks. Progress is tracked with
//! [`SharedCounters`]; the coordinator uses [`CheckpointTimer`],
//! [`RateMeasure`] and [`LrSchedule`] to drive checkpoints and the learning
//! rate.
pub mod checkpoint;
pub mod error;
pub mod params;
pub mod record;

mod base;
pub use base::{
    ActorCritic, BuildEnv, Env, Prediction, SharedOptimizer, Sgd, Step, NOOP_ACTION_NAME,
};

mod counter;
pub use counter::{SharedCounter, SharedCounters};

mod gradient;
pub use gradient::{GradientBuffer, GradientSet};

mod lr_scheduler;
pub use lr_scheduler::{LrSchedule, LrScheduleConfig, LrScheduleKind};

mod returns;
pub use returns::ReturnEstimator;

mod timer;
pub use timer::{CheckpointTimer, RateMeasure};

pub use params::{ParamSpec, ParamsSnapshot, SharedParams};
