use anyhow::Result;
use hogwild_core::{
    error::HogwildError,
    record::{Record, RecordValue, EPISODE_LENGTH_STEPS, EPISODE_REWARD_SUM},
    Env, Step,
};
use log::debug;

/// Tracks episode reward sums and lengths.
///
/// When an episode ends, its summary is put into the step's [`Record`] under
/// [`EPISODE_REWARD_SUM`] and [`EPISODE_LENGTH_STEPS`]. Stepping a finished
/// episode without resetting it is an error.
pub struct EpisodeMonitor<E> {
    env: E,
    episode_n: usize,
    reward_sum: f32,
    length_steps: usize,
    state: EpisodeState,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum EpisodeState {
    NotStarted,
    Running,
    Done,
}

impl<E: Env> EpisodeMonitor<E> {
    /// Wraps `env`.
    pub fn new(env: E) -> Self {
        Self {
            env,
            episode_n: 0,
            reward_sum: 0.0,
            length_steps: 0,
            state: EpisodeState::NotStarted,
        }
    }

    /// Number of episodes started so far.
    pub fn episode_n(&self) -> usize {
        self.episode_n
    }

    /// Reward sum of the current episode.
    pub fn reward_sum(&self) -> f32 {
        self.reward_sum
    }
}

impl<E: Env> Env for EpisodeMonitor<E> {
    type Obs = E::Obs;

    fn reset(&mut self) -> Result<Self::Obs> {
        let obs = self.env.reset()?;
        self.episode_n += 1;
        self.reward_sum = 0.0;
        self.length_steps = 0;
        self.state = EpisodeState::Running;
        Ok(obs)
    }

    fn step(&mut self, act: usize) -> Result<(Step<Self::Obs>, Record)> {
        match self.state {
            EpisodeState::NotStarted => {
                return Err(HogwildError::NotReset { stage: "episode monitor" }.into())
            }
            EpisodeState::Done => return Err(HogwildError::StepAfterDone.into()),
            EpisodeState::Running => {}
        }

        let (step, mut record) = self.env.step(act)?;
        self.reward_sum += step.reward;
        self.length_steps += 1;

        if step.is_done {
            debug!(
                "Episode {} finished; reward sum {}",
                self.episode_n, self.reward_sum
            );
            record.insert(EPISODE_REWARD_SUM, RecordValue::Scalar(self.reward_sum));
            record.insert(
                EPISODE_LENGTH_STEPS,
                RecordValue::Scalar(self.length_steps as f32),
            );
            self.state = EpisodeState::Done;
        }

        Ok((step, record))
    }

    fn action_meanings(&self) -> Vec<String> {
        self.env.action_meanings()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::test::MovingMarkerEnv;

    #[test]
    fn test_episode_summary() -> Result<()> {
        let mut env = EpisodeMonitor::new(MovingMarkerEnv::new().done_at(3));
        env.reset()?;

        let (_, record) = env.step(0)?;
        assert!(record.is_empty());
        env.step(0)?;
        let (step, record) = env.step(0)?;
        assert!(step.is_done);

        let expected: f32 = (1..=3).map(MovingMarkerEnv::reward).sum();
        assert_eq!(record.get_scalar(EPISODE_REWARD_SUM)?, expected);
        assert_eq!(record.get_scalar(EPISODE_LENGTH_STEPS)?, 3.0);
        assert_eq!(env.episode_n(), 1);
        Ok(())
    }

    #[test]
    fn test_step_after_done() -> Result<()> {
        let mut env = EpisodeMonitor::new(MovingMarkerEnv::new().done_at(1));
        env.reset()?;
        env.step(0)?;

        let err = env.step(0).unwrap_err();
        assert_eq!(
            err.downcast_ref::<HogwildError>(),
            Some(&HogwildError::StepAfterDone)
        );

        env.reset()?;
        assert!(env.step(0).is_ok());
        assert_eq!(env.episode_n(), 2);
        Ok(())
    }

    #[test]
    fn test_step_before_reset() {
        let mut env = EpisodeMonitor::new(MovingMarkerEnv::new());
        assert!(env.step(0).is_err());
    }
}
