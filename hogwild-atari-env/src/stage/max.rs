use crate::frame::FrameRing;
use anyhow::Result;
use hogwild_core::{error::HogwildError, record::Record, Env, Step};
use ndarray::{Array, Dimension, Zip};
use std::fmt::Debug;

const STAGE: &str = "frame maxing";

/// Elementwise maximum over the two most recent frames.
///
/// Removes the flicker of sprites drawn only on every other frame. At reset
/// the first frame comes from the inner reset and the second from one no-op
/// step, so the first observation is `max(frame 0, frame 1)`; the `i`-th step
/// then emits `max(frame i, frame i + 1)`.
pub struct MaxFrames<E: Env> {
    env: E,
    noop: usize,
    frames: FrameRing<E::Obs>,
}

impl<E, A, D> MaxFrames<E>
where
    E: Env<Obs = Array<A, D>>,
    A: Copy + PartialOrd + Debug,
    D: Dimension,
{
    /// Wraps `env`. Fails if it has no no-op action.
    pub fn new(env: E) -> Result<Self> {
        let noop = env
            .noop_action()
            .ok_or_else(|| HogwildError::NoopActionNotFound(env.action_meanings()))?;
        Ok(Self {
            env,
            noop,
            frames: FrameRing::new(2),
        })
    }

    fn max(&self) -> Result<Array<A, D>> {
        let mut it = self.frames.iter();
        let (a, b) = match (it.next(), it.next()) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(HogwildError::NotReset { stage: STAGE }.into()),
        };
        if a.shape() != b.shape() {
            return Err(HogwildError::InvalidFrame(format!(
                "cannot max frames of shapes {:?} and {:?}",
                a.shape(),
                b.shape()
            ))
            .into());
        }
        Ok(Zip::from(a)
            .and(b)
            .map_collect(|&x, &y| if y > x { y } else { x }))
    }
}

impl<E, A, D> Env for MaxFrames<E>
where
    E: Env<Obs = Array<A, D>>,
    A: Copy + PartialOrd + Debug,
    D: Dimension,
{
    type Obs = Array<A, D>;

    fn reset(&mut self) -> Result<Self::Obs> {
        self.frames.clear();
        let frame = self.env.reset()?;
        self.frames.push(frame);

        let (step, _) = self.env.step(self.noop)?;
        if step.is_done {
            return Err(HogwildError::DoneDuringReset { stage: STAGE }.into());
        }
        self.frames.push(step.obs);

        self.max()
    }

    fn step(&mut self, act: usize) -> Result<(Step<Self::Obs>, Record)> {
        if !self.frames.is_full() {
            return Err(HogwildError::NotReset { stage: STAGE }.into());
        }
        let (step, record) = self.env.step(act)?;
        self.frames.push(step.obs);
        Ok((Step::new(self.max()?, step.reward, step.is_done), record))
    }

    fn action_meanings(&self) -> Vec<String> {
        self.env.action_meanings()
    }
}
