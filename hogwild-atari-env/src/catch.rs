//! A small ball-catching game rendered like an Atari screen.
use crate::frame::RgbFrame;
use anyhow::Result;
use hogwild_core::{error::HogwildError, record::Record, Env, Step};
use ndarray::{aview1, s, Array3, Axis};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;

const HEIGHT: usize = 210;
const WIDTH: usize = 160;
const BALL_SIZE: usize = 8;
const PADDLE_WIDTH: usize = 32;
const PADDLE_HEIGHT: usize = 6;
const PADDLE_ROW: usize = 190;
const BALL_COLOR: [u8; 3] = [236, 236, 236];
const PADDLE_COLOR: [u8; 3] = [92, 186, 92];

/// Actions of [`CatchEnv`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CatchAction {
    /// Stay.
    Noop,
    /// Move the paddle left.
    Left,
    /// Move the paddle right.
    Right,
}

impl CatchAction {
    const ALL: [CatchAction; 3] = [CatchAction::Noop, CatchAction::Left, CatchAction::Right];
}

/// Configuration of [`CatchEnv`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatchConfig {
    /// Balls dropped per episode.
    pub balls_per_episode: usize,

    /// Pixels the ball falls per frame.
    pub ball_speed: usize,

    /// Pixels the paddle moves per frame.
    pub paddle_speed: usize,
}

impl Default for CatchConfig {
    fn default() -> Self {
        Self {
            balls_per_episode: 5,
            ball_speed: 8,
            paddle_speed: 8,
        }
    }
}

/// Catch: a paddle at the bottom of the screen catches falling balls.
///
/// Each caught ball is worth +1, each missed one -1. An episode ends after
/// [`CatchConfig::balls_per_episode`] balls. Frames are `210x160` RGB, like
/// the Atari 2600 screen.
pub struct CatchEnv {
    config: CatchConfig,
    rng: SmallRng,
    ball_row: usize,
    ball_col: usize,
    paddle_col: usize,
    balls_left: usize,
}

impl CatchEnv {
    /// Creates the game with a given random seed.
    pub fn new(config: CatchConfig, seed: u64) -> Result<Self> {
        if config.balls_per_episode == 0 || config.ball_speed == 0 {
            return Err(HogwildError::InvalidConfig(
                "Catch needs at least one ball and a positive ball speed".to_string(),
            )
            .into());
        }
        let mut env = Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
            ball_row: 0,
            ball_col: 0,
            paddle_col: (WIDTH - PADDLE_WIDTH) / 2,
            balls_left: 0,
        };
        env.new_episode();
        Ok(env)
    }

    fn new_episode(&mut self) {
        self.paddle_col = (WIDTH - PADDLE_WIDTH) / 2;
        self.balls_left = self.config.balls_per_episode;
        self.drop_ball();
    }

    fn drop_ball(&mut self) {
        self.ball_row = 0;
        self.ball_col = self.rng.gen_range(0..=WIDTH - BALL_SIZE);
    }

    fn render(&self) -> RgbFrame {
        let mut frame = Array3::zeros((HEIGHT, WIDTH, 3));
        let ball = s![
            self.ball_row..(self.ball_row + BALL_SIZE).min(HEIGHT),
            self.ball_col..self.ball_col + BALL_SIZE,
            ..
        ];
        for mut px in frame.slice_mut(ball).lanes_mut(Axis(2)) {
            px.assign(&aview1(&BALL_COLOR));
        }
        let paddle = s![
            PADDLE_ROW..PADDLE_ROW + PADDLE_HEIGHT,
            self.paddle_col..self.paddle_col + PADDLE_WIDTH,
            ..
        ];
        for mut px in frame.slice_mut(paddle).lanes_mut(Axis(2)) {
            px.assign(&aview1(&PADDLE_COLOR));
        }
        frame
    }

    fn ball_landed(&self) -> bool {
        self.ball_row + BALL_SIZE >= PADDLE_ROW
    }

    fn ball_caught(&self) -> bool {
        self.ball_col + BALL_SIZE > self.paddle_col && self.ball_col < self.paddle_col + PADDLE_WIDTH
    }
}

impl Env for CatchEnv {
    type Obs = RgbFrame;

    fn reset(&mut self) -> Result<RgbFrame> {
        self.new_episode();
        Ok(self.render())
    }

    fn step(&mut self, act: usize) -> Result<(Step<RgbFrame>, Record)> {
        if self.balls_left == 0 {
            return Err(HogwildError::StepAfterDone.into());
        }
        let act = CatchAction::ALL.get(act).copied().ok_or_else(|| {
            HogwildError::InvalidConfig(format!("Catch has no action with index {}", act))
        })?;
        match act {
            CatchAction::Noop => {}
            CatchAction::Left => {
                self.paddle_col = self.paddle_col.saturating_sub(self.config.paddle_speed)
            }
            CatchAction::Right => {
                self.paddle_col = (self.paddle_col + self.config.paddle_speed).min(WIDTH - PADDLE_WIDTH)
            }
        }

        self.ball_row += self.config.ball_speed;
        let mut reward = 0.0;
        let mut is_done = false;
        if self.ball_landed() {
            reward = if self.ball_caught() { 1.0 } else { -1.0 };
            self.balls_left -= 1;
            if self.balls_left == 0 {
                is_done = true;
                self.ball_row = PADDLE_ROW - BALL_SIZE;
            } else {
                self.drop_ball();
            }
        }

        Ok((Step::new(self.render(), reward, is_done), Record::empty()))
    }

    fn action_meanings(&self) -> Vec<String> {
        CatchAction::ALL
            .iter()
            .map(|a| <&'static str>::from(*a).to_string())
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_action_meanings() -> Result<()> {
        let env = CatchEnv::new(CatchConfig::default(), 0)?;
        assert_eq!(env.action_meanings(), vec!["NOOP", "LEFT", "RIGHT"]);
        assert_eq!(env.noop_action(), Some(0));
        Ok(())
    }

    #[test]
    fn test_episode() -> Result<()> {
        let config = CatchConfig::default();
        let balls = config.balls_per_episode;
        let mut env = CatchEnv::new(config, 1)?;
        let obs = env.reset()?;
        assert_eq!(obs.dim(), (HEIGHT, WIDTH, 3));
        assert!(obs.iter().any(|&x| x > 0));

        let mut n_rewards = 0;
        let mut n_steps = 0;
        loop {
            let (step, _) = env.step(0)?;
            n_steps += 1;
            if step.reward != 0.0 {
                assert!(step.reward == 1.0 || step.reward == -1.0);
                n_rewards += 1;
            }
            if step.is_done {
                break;
            }
            assert!(n_steps < 10_000);
        }
        assert_eq!(n_rewards, balls);
        // Long enough for no-op starts and the reset fill of the preprocessing stages
        assert!(n_steps > 60, "{}", n_steps);
        Ok(())
    }

    #[test]
    fn test_same_seed_same_frames() -> Result<()> {
        let mut env1 = CatchEnv::new(CatchConfig::default(), 5)?;
        let mut env2 = CatchEnv::new(CatchConfig::default(), 5)?;
        assert_eq!(env1.reset()?, env2.reset()?);
        for a in [0, 1, 2, 2, 1] {
            assert_eq!(env1.step(a)?.0.obs, env2.step(a)?.0.obs);
        }
        Ok(())
    }

    #[test]
    fn test_step_after_done() -> Result<()> {
        let config = CatchConfig {
            balls_per_episode: 1,
            ..CatchConfig::default()
        };
        let mut env = CatchEnv::new(config, 2)?;
        env.reset()?;
        while !env.step(0)?.0.is_done {}

        let err = env.step(0).err().and_then(|e| e.downcast::<HogwildError>().ok());
        assert_eq!(err, Some(HogwildError::StepAfterDone));

        // A new episode can be played after reset
        env.reset()?;
        assert!(env.step(0).is_ok());
        Ok(())
    }

    #[test]
    fn test_invalid_action() -> Result<()> {
        let mut env = CatchEnv::new(CatchConfig::default(), 0)?;
        env.reset()?;
        assert!(env.step(3).is_err());
        Ok(())
    }
}
