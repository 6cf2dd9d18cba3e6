//! Command line front end of hogwild actor-critic training.
//!
//! The `hogwild` binary trains a [`CnnActorCritic`](hogwild_candle_agent::CnnActorCritic)
//! on an [`AtariEnv`](hogwild_atari_env::AtariEnv) with lock-free parallel
//! workers, or evaluates a checkpoint with `--eval --load-ckpt <path>`.
pub mod args;
pub mod config;
pub mod eval;
pub use args::Args;
pub use config::{create_run_dir, run_dir, HogwildConfig};
pub use eval::Evaluator;
