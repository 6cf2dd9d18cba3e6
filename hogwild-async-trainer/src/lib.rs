//! Lock-free multi-worker actor-critic training.
//!
//! Each [`Worker`] owns an environment and a copy of the model and loops over
//! update cycles: it copies the global [`SharedParams`](hogwild_core::SharedParams)
//! into its model, collects a bounded rollout with a [`RolloutCollector`],
//! turns rewards into discounted returns, computes gradients and applies them
//! to the global parameters through a shared optimizer. Workers never wait
//! for each other; concurrent updates to the same parameter may interleave.
//!
//! The [`Coordinator`] only observes. It reports progress, computes the
//! learning rate for the records, saves checkpoints on a wall-clock
//! interval and stops once no worker is alive.
//!
//! # Messages
//! * From [`Worker`] to [`Coordinator`]
//!   - [`WorkerMessage::Episode`], one per finished episode.
//!   - [`WorkerMessage::Update`], one per update cycle, with the losses and
//!     the gradient norm.
mod coordinator;
mod messages;
mod rollout;
mod worker;
mod worker_manager;
pub mod util;
pub use coordinator::{Coordinator, CoordinatorStat, HogwildTrainerConfig};
pub use messages::{EpisodeMessage, UpdateMessage, WorkerMessage};
pub use rollout::{EpisodeSummary, Rollout, RolloutCollector, Trajectory};
pub use util::{init_params, train_hogwild, train_hogwild_with_store};
pub use worker::{worker_stats_fmt, Worker, WorkerShared, WorkerStat};
pub use worker_manager::WorkerManager;
