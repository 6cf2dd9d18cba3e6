use anyhow::Result;
use hogwild_core::{error::HogwildError, LrScheduleConfig, ReturnEstimator};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
    time::Duration,
};

/// Configuration of hogwild training.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct HogwildTrainerConfig {
    /// Number of worker threads.
    pub n_workers: usize,

    /// Environment steps per update cycle.
    pub steps_per_update: usize,

    /// Discount factor in `(0, 1]`.
    pub discount: f32,

    /// Learning rate schedule.
    pub lr_schedule: LrScheduleConfig,

    /// Minimum time between two checkpoints, in seconds.
    pub ckpt_interval_secs: u64,

    /// Time between two wakes of the coordinator, in seconds.
    pub wake_interval_secs: f32,

    /// Total number of environment steps over all workers.
    pub n_steps: u64,

    /// Base random seed.
    pub seed: i64,

    /// Where checkpoints and logs are written.
    pub model_dir: Option<String>,
}

impl Default for HogwildTrainerConfig {
    fn default() -> Self {
        Self {
            n_workers: 16,
            steps_per_update: 5,
            discount: 0.99,
            lr_schedule: LrScheduleConfig::default(),
            ckpt_interval_secs: 600,
            wake_interval_secs: 1.0,
            n_steps: 10_000_000,
            seed: 0,
            model_dir: None,
        }
    }
}

impl HogwildTrainerConfig {
    /// Constructs [`HogwildTrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`HogwildTrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }

    /// Rollout length, which equals the steps per update cycle.
    pub fn max_steps_per_rollout(&self) -> usize {
        self.steps_per_update
    }

    /// Checks the values that would make training fail later.
    pub fn validate(&self) -> Result<()> {
        if self.n_workers == 0 {
            return Err(HogwildError::InvalidConfig("at least one worker is required".into()).into());
        }
        if self.steps_per_update == 0 {
            return Err(
                HogwildError::InvalidConfig("steps_per_update must be positive".into()).into(),
            );
        }
        if !(self.wake_interval_secs > 0.0)
            || Duration::try_from_secs_f32(self.wake_interval_secs).is_err()
        {
            return Err(HogwildError::InvalidConfig(format!(
                "wake_interval_secs must be a positive finite duration, got {}",
                self.wake_interval_secs
            ))
            .into());
        }
        ReturnEstimator::new(self.discount)?;
        self.lr_schedule.validate(self.n_steps)?;
        Ok(())
    }

    /// Sets the number of workers.
    pub fn n_workers(mut self, v: usize) -> Self {
        self.n_workers = v;
        self
    }

    /// Sets the steps per update cycle.
    pub fn steps_per_update(mut self, v: usize) -> Self {
        self.steps_per_update = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount(mut self, v: f32) -> Self {
        self.discount = v;
        self
    }

    /// Sets the learning rate schedule.
    pub fn lr_schedule(mut self, v: LrScheduleConfig) -> Self {
        self.lr_schedule = v;
        self
    }

    /// Sets the checkpoint interval in seconds.
    pub fn ckpt_interval_secs(mut self, v: u64) -> Self {
        self.ckpt_interval_secs = v;
        self
    }

    /// Sets the wake interval in seconds.
    pub fn wake_interval_secs(mut self, v: f32) -> Self {
        self.wake_interval_secs = v;
        self
    }

    /// Sets the total step budget.
    pub fn n_steps(mut self, v: u64) -> Self {
        self.n_steps = v;
        self
    }

    /// Sets the seed.
    pub fn seed(mut self, v: i64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the directory the trained model being saved.
    pub fn model_dir<T: Into<String>>(mut self, model_dir: T) -> Self {
        self.model_dir = Some(model_dir.into());
        self
    }
}
