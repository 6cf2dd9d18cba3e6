use anyhow::Result;
use hogwild_core::{error::HogwildError, record::Record, Env, Step};
use log::trace;
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Starts every episode with a random number of no-op actions.
///
/// The number is drawn uniformly from `0..=max_n_noops`. If the episode ends
/// during the no-ops the inner environment is reset again.
pub struct NoopReset<E> {
    env: E,
    noop: usize,
    max_n_noops: usize,
    rng: SmallRng,
}

impl<E: Env> NoopReset<E> {
    /// Wraps `env`. Fails if it has no no-op action.
    pub fn new(env: E, max_n_noops: usize, seed: u64) -> Result<Self> {
        let noop = env
            .noop_action()
            .ok_or_else(|| HogwildError::NoopActionNotFound(env.action_meanings()))?;
        Ok(Self {
            env,
            noop,
            max_n_noops,
            rng: SmallRng::seed_from_u64(seed),
        })
    }
}

impl<E: Env> Env for NoopReset<E> {
    type Obs = E::Obs;

    fn reset(&mut self) -> Result<Self::Obs> {
        let mut obs = self.env.reset()?;
        let n_noops = self.rng.gen_range(0..=self.max_n_noops);
        trace!("Taking {} no-op actions", n_noops);

        for _ in 0..n_noops {
            let (step, _) = self.env.step(self.noop)?;
            obs = if step.is_done {
                self.env.reset()?
            } else {
                step.obs
            };
        }
        Ok(obs)
    }

    fn step(&mut self, act: usize) -> Result<(Step<Self::Obs>, Record)> {
        self.env.step(act)
    }

    fn action_meanings(&self) -> Vec<String> {
        self.env.action_meanings()
    }
}
