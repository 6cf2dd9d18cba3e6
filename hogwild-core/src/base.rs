//! Capabilities the training loop is written against.
mod env;
mod model;
mod optimizer;
mod step;
pub use env::{BuildEnv, Env, NOOP_ACTION_NAME};
pub use model::{ActorCritic, Prediction};
pub use optimizer::{SharedOptimizer, Sgd};
pub use step::Step;
