//! Records of training metrics and the sinks they are written to.
//!
//! A [`Record`] is a bag of named values. Environments attach one to every
//! step (e.g. the episode summary emitted by the episode monitor), the
//! coordinator builds one on every wake, and a [`Recorder`] decides where
//! they end up.
//!
//! ```rust
//! use hogwild_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("misc/steps", 1200.0);
//! record.insert("misc/lr", RecordValue::Scalar(5e-4));
//! assert_eq!(record.get_scalar("misc/steps").unwrap(), 1200.0);
//! ```
mod base;
mod buffered_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use recorder::Recorder;
pub use storage::RecordStorage;

/// Key of the reward sum of a finished episode.
pub const EPISODE_REWARD_SUM: &str = "rl/episode_reward_sum";

/// Key of the length of a finished episode, in agent steps.
pub const EPISODE_LENGTH_STEPS: &str = "rl/episode_length_steps";

/// Key of the global gradient norm of one update, before clipping.
pub const GRAD_NORM: &str = "loss/grad_norm";
