use anyhow::Result;
use hogwild_core::{error::HogwildError, record::Record, Env, Step};

/// Repeats every action for a fixed number of inner steps.
///
/// Only the last observation and the last reward are returned; rewards of
/// the repeated steps before it are dropped, not summed. The repetition
/// stops early when the episode ends.
pub struct FrameSkip<E> {
    env: E,
    n: usize,
}

impl<E: Env> FrameSkip<E> {
    /// Repeats each action `n` times. Fails if `n` is zero.
    pub fn new(env: E, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(HogwildError::InvalidConfig("frame skip must be at least 1".into()).into());
        }
        Ok(Self { env, n })
    }
}

impl<E: Env> Env for FrameSkip<E> {
    type Obs = E::Obs;

    fn reset(&mut self) -> Result<Self::Obs> {
        self.env.reset()
    }

    fn step(&mut self, act: usize) -> Result<(Step<Self::Obs>, Record)> {
        let (mut step, mut record) = self.env.step(act)?;
        for _ in 1..self.n {
            if step.is_done {
                break;
            }
            let (s, r) = self.env.step(act)?;
            step = s;
            record.merge_inplace(r);
        }
        Ok((step, record))
    }

    fn action_meanings(&self) -> Vec<String> {
        self.env.action_meanings()
    }
}
