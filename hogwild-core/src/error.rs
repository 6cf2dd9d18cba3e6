//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum HogwildError {
    /// The wrapped environment has no action named `NOOP`.
    #[error("Unsure about environment's NOOP action; action meanings were {0:?}")]
    NoopActionNotFound(Vec<String>),

    /// The environment signalled the end of an episode while a stage was
    /// filling its buffers at reset.
    #[error("Environment signalled done during {stage}")]
    DoneDuringReset {
        /// Name of the stage being filled.
        stage: &'static str,
    },

    /// `step()` was called on an episode that has already finished.
    #[error("Attempted to call step() after episode done")]
    StepAfterDone,

    /// `step()` was called before the first `reset()`.
    #[error("{stage}: step() called before reset()")]
    NotReset {
        /// Name of the stage.
        stage: &'static str,
    },

    /// Discount factor out of `(0, 1]`.
    #[error("Discount factor must lie in (0, 1], got {0}")]
    InvalidDiscount(f32),

    /// Malformed learning rate schedule.
    #[error("Invalid learning rate schedule: {0}")]
    InvalidLrSchedule(String),

    /// Parameter shapes or names do not agree.
    #[error("Parameter mismatch: {0}")]
    ParamsMismatch(String),

    /// A frame has a shape the stage cannot handle.
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Any other malformed configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
