//! Preprocessing stages.
//!
//! Every stage wraps an inner [`Env`] and is itself an [`Env`], so a
//! preprocessing pipeline is a stack of stages around a raw emulator.
//! Stateless per-frame conversions implement [`FrameTransform`] and are
//! lifted to a stage with [`Transformed`].
use anyhow::Result;
use hogwild_core::{record::Record, Env, Step};
use std::fmt::Debug;

mod luminance;
mod max;
mod monitor;
mod noop_reset;
mod normalize;
mod pong;
mod skip;
mod stack;
pub use luminance::LuminanceScale;
pub use max::MaxFrames;
pub use monitor::EpisodeMonitor;
pub use noop_reset::NoopReset;
pub use normalize::Normalize;
pub use pong::PongFeatures;
pub use skip::FrameSkip;
pub use stack::FrameStack;

/// A deterministic conversion of a single frame.
pub trait FrameTransform {
    /// Frame type consumed.
    type Input;

    /// Frame type produced.
    type Output: Clone + Debug;

    /// Converts one frame.
    fn transform(&self, frame: Self::Input) -> Result<Self::Output>;
}

/// Applies a [`FrameTransform`] to every observation of the inner environment.
pub struct Transformed<E, T> {
    env: E,
    transform: T,
}

impl<E, T> Transformed<E, T>
where
    E: Env,
    T: FrameTransform<Input = E::Obs>,
{
    /// Wraps `env`.
    pub fn new(env: E, transform: T) -> Self {
        Self { env, transform }
    }
}

impl<E, T> Env for Transformed<E, T>
where
    E: Env,
    T: FrameTransform<Input = E::Obs>,
{
    type Obs = T::Output;

    fn reset(&mut self) -> Result<Self::Obs> {
        let frame = self.env.reset()?;
        self.transform.transform(frame)
    }

    fn step(&mut self, act: usize) -> Result<(Step<Self::Obs>, Record)> {
        let (step, record) = self.env.step(act)?;
        let obs = self.transform.transform(step.obs)?;
        Ok((Step::new(obs, step.reward, step.is_done), record))
    }

    fn action_meanings(&self) -> Vec<String> {
        self.env.action_meanings()
    }
}
