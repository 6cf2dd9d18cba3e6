//! Actor-critic model on a convolutional torso.
mod base;
mod config;
mod init;
pub use base::CnnActorCritic;
pub use config::ActorCriticConfig;
pub use init::WeightInit;
