//! Bounded interaction with one environment.
use anyhow::{anyhow, Result};
use hogwild_core::{record::Record, ActorCritic, Env};
use rand::{distributions::WeightedIndex, prelude::Distribution, rngs::SmallRng};

/// Observations, actions and rewards of one rollout, in order.
#[derive(Clone, Debug)]
pub struct Trajectory<O> {
    /// Observation before each action.
    pub obs: Vec<O>,

    /// Actions taken.
    pub acts: Vec<usize>,

    /// Rewards received.
    pub rewards: Vec<f32>,
}

impl<O> Trajectory<O> {
    fn with_capacity(n: usize) -> Self {
        Self {
            obs: Vec::with_capacity(n),
            acts: Vec::with_capacity(n),
            rewards: Vec::with_capacity(n),
        }
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.acts.len()
    }

    /// `true` if no step was taken.
    pub fn is_empty(&self) -> bool {
        self.acts.is_empty()
    }
}

/// Summary of an episode that ended during a rollout.
#[derive(Clone, Debug)]
pub struct EpisodeSummary {
    /// Sum of rewards.
    pub reward_sum: f32,

    /// Number of steps.
    pub length: usize,

    /// Record of the step that ended the episode.
    pub record: Record,
}

/// Result of [`RolloutCollector::collect`].
#[derive(Debug)]
pub struct Rollout<O> {
    /// Collected steps.
    pub trajectory: Trajectory<O>,

    /// Observation after the last step, used to bootstrap the return.
    pub final_obs: O,

    /// `true` if the rollout ended because the episode did.
    pub terminated: bool,

    /// Set when the episode ended in this rollout.
    pub episode: Option<EpisodeSummary>,
}

/// Drives an environment with actions sampled from a model.
///
/// The collector keeps the current observation between rollouts, so an
/// episode spans as many rollouts as it takes. After an episode ends the
/// next rollout starts with a reset.
pub struct RolloutCollector<E: Env> {
    env: E,
    obs: Option<E::Obs>,
    reward_sum: f32,
    length: usize,
    rng: SmallRng,
}

impl<E: Env> RolloutCollector<E> {
    /// Creates a collector; the environment is reset on the first rollout.
    pub fn new(env: E, rng: SmallRng) -> Self {
        Self {
            env,
            obs: None,
            reward_sum: 0.0,
            length: 0,
            rng,
        }
    }

    /// The environment.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Samples an action from the model's distribution for `obs`.
    pub fn sample_action<M: ActorCritic<E::Obs>>(&mut self, model: &M, obs: &E::Obs) -> Result<usize> {
        let probs = model.predict(obs)?.action_probs;
        let dist = WeightedIndex::new(&probs)
            .map_err(|e| anyhow!("Invalid action distribution {:?}: {}", probs, e))?;
        Ok(dist.sample(&mut self.rng))
    }

    /// Takes up to `max_steps` steps, stopping early at the end of an episode.
    pub fn collect<M: ActorCritic<E::Obs>>(
        &mut self,
        model: &M,
        max_steps: usize,
    ) -> Result<Rollout<E::Obs>> {
        let mut obs = match self.obs.take() {
            Some(obs) => obs,
            None => {
                self.reward_sum = 0.0;
                self.length = 0;
                self.env.reset()?
            }
        };
        let mut trajectory = Trajectory::with_capacity(max_steps);
        let mut episode = None;

        while trajectory.len() < max_steps {
            let act = self.sample_action(model, &obs)?;
            let (step, record) = self.env.step(act)?;
            self.reward_sum += step.reward;
            self.length += 1;

            trajectory.obs.push(std::mem::replace(&mut obs, step.obs));
            trajectory.acts.push(act);
            trajectory.rewards.push(step.reward);

            if step.is_done {
                episode = Some(EpisodeSummary {
                    reward_sum: self.reward_sum,
                    length: self.length,
                    record,
                });
                break;
            }
        }

        let terminated = episode.is_some();
        if !terminated {
            self.obs = Some(obs.clone());
        }

        Ok(Rollout {
            trajectory,
            final_obs: obs,
            terminated,
            episode,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::test::{Corridor, LinearSoftmax, LinearSoftmaxConfig};
    use hogwild_core::{BuildEnv, ActorCritic as _};
    use rand::SeedableRng;

    fn model() -> LinearSoftmax {
        LinearSoftmax::build(LinearSoftmaxConfig::new(Corridor::LENGTH, 3)).unwrap()
    }

    #[test]
    fn test_rollout_is_bounded() -> Result<()> {
        let env = Corridor::build(&Corridor::config(), 0)?;
        let mut collector = RolloutCollector::new(env, SmallRng::seed_from_u64(0));
        let model = model();

        let rollout = collector.collect(&model, 3)?;
        assert_eq!(rollout.trajectory.len(), 3);
        assert_eq!(rollout.trajectory.obs.len(), 3);
        assert!(!rollout.terminated);
        assert!(rollout.episode.is_none());
        Ok(())
    }

    #[test]
    fn test_rollout_continues_episode() -> Result<()> {
        // Always moves right, so the episode lasts exactly LENGTH - 1 steps
        let env = Corridor::build(&Corridor::config(), 0)?;
        let mut collector = RolloutCollector::new(env, SmallRng::seed_from_u64(0));
        let model = LinearSoftmax::always(Corridor::LENGTH, 3, Corridor::RIGHT);

        let first = collector.collect(&model, 2)?;
        assert_eq!(first.final_obs, Corridor::one_hot(2));
        let second = collector.collect(&model, 100)?;
        assert_eq!(second.trajectory.obs[0], Corridor::one_hot(2));
        assert!(second.terminated);
        assert_eq!(second.trajectory.len(), Corridor::LENGTH - 3);

        let episode = second.episode.unwrap();
        assert_eq!(episode.length, Corridor::LENGTH - 1);
        assert_eq!(episode.reward_sum, 1.0);

        // A new episode starts from the reset observation
        let third = collector.collect(&model, 1)?;
        assert_eq!(third.trajectory.obs[0], Corridor::one_hot(0));
        assert_eq!(collector.env().n_resets(), 2);
        Ok(())
    }
}
