//! Environment.
use super::Step;
use crate::record::Record;
use anyhow::Result;
use std::fmt::Debug;

/// Name of the action that leaves the game state untouched.
pub const NOOP_ACTION_NAME: &str = "NOOP";

/// An episodic environment with a discrete action set.
///
/// Preprocessing stages implement this trait too, each wrapping an inner
/// environment, so that a pipeline is just a stack of [`Env`]s.
pub trait Env {
    /// Observation of the environment.
    type Obs: Clone + Debug;

    /// Starts a new episode and returns its first observation.
    fn reset(&mut self) -> Result<Self::Obs>;

    /// Performs an action.
    ///
    /// The returned [`Record`] carries anything the environment wants to
    /// report besides the step itself, e.g. an episode summary.
    fn step(&mut self, act: usize) -> Result<(Step<Self::Obs>, Record)>;

    /// Names of the actions, ordered by action index.
    fn action_meanings(&self) -> Vec<String>;

    /// Number of actions.
    fn n_actions(&self) -> usize {
        self.action_meanings().len()
    }

    /// Index of the no-op action, if the environment has one.
    fn noop_action(&self) -> Option<usize> {
        self.action_meanings()
            .iter()
            .position(|m| m == NOOP_ACTION_NAME)
    }
}

impl<E: Env + ?Sized> Env for Box<E> {
    type Obs = E::Obs;

    fn reset(&mut self) -> Result<Self::Obs> {
        (**self).reset()
    }

    fn step(&mut self, act: usize) -> Result<(Step<Self::Obs>, Record)> {
        (**self).step(act)
    }

    fn action_meanings(&self) -> Vec<String> {
        (**self).action_meanings()
    }

    fn n_actions(&self) -> usize {
        (**self).n_actions()
    }

    fn noop_action(&self) -> Option<usize> {
        (**self).noop_action()
    }
}

/// An environment that can be built from a configuration and a random seed.
pub trait BuildEnv: Env + Sized {
    /// Configuration.
    type Config: Clone;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>;
}
