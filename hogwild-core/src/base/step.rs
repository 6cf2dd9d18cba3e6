//! Environment step.

/// Outcome of one [`Env::step`](super::Env::step) call.
#[derive(Clone, Debug)]
pub struct Step<O> {
    /// Observation after the action.
    pub obs: O,

    /// Reward for the action.
    pub reward: f32,

    /// `true` if the episode ended with this step.
    pub is_done: bool,
}

impl<O> Step<O> {
    /// Constructs a [`Step`].
    pub fn new(obs: O, reward: f32, is_done: bool) -> Self {
        Self {
            obs,
            reward,
            is_done,
        }
    }
}
