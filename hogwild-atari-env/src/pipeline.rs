//! Composition of the preprocessing stages.
use crate::{
    frame::{FrameStackObs, RgbFrame},
    stage::{FrameSkip, FrameStack, LuminanceScale, MaxFrames, Normalize, PongFeatures, Transformed},
};
use anyhow::Result;
use hogwild_core::Env;
use serde::{Deserialize, Serialize};

/// Number of processed frames in an observation.
pub const STACK_DEPTH: usize = 4;

/// Side length of a processed frame.
pub const FRAME_SIZE: usize = 84;

/// A preprocessed environment, as seen by the agent.
pub type BoxedEnv = Box<dyn Env<Obs = FrameStackObs> + Send>;

/// Preprocessing variant.
///
/// Both variants skip frames before stacking them, so one observation spans
/// `STACK_DEPTH * frame_skip` raw frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Preprocessing {
    /// Max over frame pairs, luminance, 84x84 rescale, `[0, 1]` normalisation.
    Generic,

    /// Binary Pong playing-field features.
    Pong,
}

impl Default for Preprocessing {
    fn default() -> Self {
        Self::Generic
    }
}

impl std::str::FromStr for Preprocessing {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "generic" => Ok(Self::Generic),
            "pong" => Ok(Self::Pong),
            _ => Err(anyhow::anyhow!("Unknown preprocessing '{}'", s)),
        }
    }
}

impl Preprocessing {
    /// Wraps a raw environment.
    pub fn wrap<E>(self, env: E, frame_skip: usize) -> Result<BoxedEnv>
    where
        E: Env<Obs = RgbFrame> + Send + 'static,
    {
        Ok(match self {
            Self::Generic => {
                let env = MaxFrames::new(env)?;
                let env = Transformed::new(env, LuminanceScale::default());
                let env = Transformed::new(env, Normalize);
                let env = FrameSkip::new(env, frame_skip)?;
                Box::new(FrameStack::new(env, STACK_DEPTH)?)
            }
            Self::Pong => {
                let env = Transformed::new(env, PongFeatures);
                let env = FrameSkip::new(env, frame_skip)?;
                Box::new(FrameStack::new(env, STACK_DEPTH)?)
            }
        })
    }
}
