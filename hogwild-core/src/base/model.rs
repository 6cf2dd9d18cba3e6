//! Policy/value model.
use crate::{params::ParamSpec, record::Record, GradientSet};
use anyhow::Result;

/// Output of [`ActorCritic::predict`] for one observation.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    /// Probability of each action.
    pub action_probs: Vec<f32>,

    /// Estimated value of the observation.
    pub value: f32,
}

/// A policy and value function sharing one parameter set.
///
/// Every worker owns one instance. Parameters are exchanged with the shared
/// store as flat `f32` vectors, one per tensor, in the order of
/// [`ActorCritic::param_specs`].
pub trait ActorCritic<O> {
    /// Configuration.
    type Config: Clone;

    /// Builds the model with freshly initialised parameters.
    fn build(config: Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Action distribution and value estimate for one observation.
    fn predict(&self, obs: &O) -> Result<Prediction>;

    /// Gradients of the combined policy and value loss with respect to the
    /// current parameters.
    ///
    /// The returned record carries loss components for logging.
    fn compute_gradients(
        &self,
        obs: &[O],
        acts: &[usize],
        returns: &[f32],
    ) -> Result<(GradientSet, Record)>;

    /// Names and shapes of the parameter tensors.
    fn param_specs(&self) -> Vec<ParamSpec>;

    /// Current parameter values.
    fn params(&self) -> Result<Vec<Vec<f32>>>;

    /// Overwrites the parameters.
    fn load_params(&mut self, values: &[Vec<f32>]) -> Result<()>;

    /// Bound on the global norm of one update's gradients, if any.
    fn max_grad_norm(&self) -> Option<f32> {
        None
    }
}
