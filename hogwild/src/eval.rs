//! Evaluation of a trained model.
use anyhow::Result;
use hogwild_async_trainer::RolloutCollector;
use hogwild_core::{ActorCritic, Env};
use log::info;
use rand::{rngs::SmallRng, SeedableRng};

const STEPS_PER_CHUNK: usize = 1000;

/// Runs whole episodes with actions sampled from the model's policy.
pub struct Evaluator<E: Env> {
    collector: RolloutCollector<E>,
    n_episodes: usize,
}

impl<E: Env> Evaluator<E> {
    /// Constructs an [`Evaluator`].
    pub fn new(env: E, n_episodes: usize, seed: u64) -> Self {
        Self {
            collector: RolloutCollector::new(env, SmallRng::seed_from_u64(seed)),
            n_episodes,
        }
    }

    /// Returns the reward sum of each episode.
    pub fn evaluate<M: ActorCritic<E::Obs>>(&mut self, model: &M) -> Result<Vec<f32>> {
        let mut reward_sums = Vec::with_capacity(self.n_episodes);
        while reward_sums.len() < self.n_episodes {
            let rollout = self.collector.collect(model, STEPS_PER_CHUNK)?;
            if let Some(episode) = rollout.episode {
                info!(
                    "Episode {} finished; reward sum {}",
                    reward_sums.len() + 1,
                    episode.reward_sum
                );
                reward_sums.push(episode.reward_sum);
            }
        }
        Ok(reward_sums)
    }
}
