//! Configuration of a training run.
use crate::args::Args;
use anyhow::{bail, Result};
use hogwild_async_trainer::HogwildTrainerConfig;
use hogwild_atari_env::AtariEnvConfig;
use hogwild_candle_agent::{opt::RmsPropConfig, ActorCriticConfig, Device};
use hogwild_core::LrScheduleConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

/// Everything needed to reproduce a run, saved as `config.yaml` in the run
/// directory.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct HogwildConfig {
    /// Environment.
    pub env: AtariEnvConfig,

    /// Model.
    pub model: ActorCriticConfig,

    /// Optimizer.
    pub optimizer: RmsPropConfig,

    /// Training loop.
    pub trainer: HogwildTrainerConfig,
}

impl HogwildConfig {
    /// Builds the configuration from command line arguments.
    ///
    /// `n_actions` is the size of the game's action set.
    pub fn from_args(args: &Args, n_actions: usize) -> Self {
        let mut env = AtariEnvConfig::default()
            .name(args.game.clone())
            .preprocessing(args.preprocessing.into())
            .frame_skip(args.frame_skip)
            .max_n_noops(args.max_n_noops);
        if let Some(rom_dir) = &args.rom_dir {
            env = env.rom_dir(rom_dir.clone());
        }

        let max_grad_norm = if args.max_grad_norm > 0.0 {
            Some(args.max_grad_norm)
        } else {
            None
        };
        let device = match args.cuda {
            Some(n) => Device::Cuda(n),
            None => Device::Cpu,
        };
        let model = ActorCriticConfig::default()
            .n_actions(n_actions)
            .value_loss_coef(args.value_loss_coef)
            .entropy_bonus(args.entropy_bonus)
            .max_grad_norm(max_grad_norm)
            .weight_init(args.weight_init.into())
            .device(device);

        let optimizer = RmsPropConfig::default()
            .decay(args.rmsprop_decay)
            .eps(args.rmsprop_eps);

        let lr_schedule = LrScheduleConfig {
            initial: args.initial_lr,
            kind: args.lr_schedule.into(),
            zero_by_steps: args.lr_decay_to_zero_by_n_steps,
        };
        let trainer = HogwildTrainerConfig::default()
            .n_workers(args.n_workers)
            .steps_per_update(args.steps_per_update)
            .discount(args.discount)
            .lr_schedule(lr_schedule)
            .ckpt_interval_secs(args.ckpt_interval_seconds)
            .wake_interval_secs(args.wake_interval_seconds)
            .n_steps(args.n_steps)
            .seed(args.seed)
            .model_dir(run_dir(args).to_string_lossy());

        Self {
            env,
            model,
            optimizer,
            trainer,
        }
    }

    /// Constructs [`HogwildConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`HogwildConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Directory of the run: `<log_dir>/<run_name>`, the run name defaulting to
/// the current local time.
pub fn run_dir(args: &Args) -> PathBuf {
    let run_name = match &args.run_name {
        Some(name) => name.clone(),
        None => chrono::Local::now().format("%Y%m%d-%H%M%S").to_string(),
    };
    args.log_dir.join(run_name)
}

/// Creates the run directory. Fails if it exists, so that two runs never
/// share checkpoints or `config.yaml`.
pub fn create_run_dir(dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    if dir.exists() {
        bail!("Run directory {:?} already exists", dir);
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::Parser;
    use hogwild_atari_env::Preprocessing;
    use hogwild_candle_agent::WeightInit;
    use hogwild_core::LrScheduleKind;
    use tempdir::TempDir;

    #[test]
    fn test_from_args() -> Result<()> {
        let args = Args::try_parse_from([
            "hogwild",
            "--n-workers",
            "3",
            "--preprocessing",
            "pong",
            "--lr-schedule",
            "linear",
            "--lr-decay-to-zero-by-n-steps",
            "2000",
            "--n-steps",
            "1000",
            "--weight-init",
            "glorot",
            "--max-grad-norm",
            "0",
            "--log-dir",
            "logs",
            "--run-name",
            "test",
        ])?;
        let config = HogwildConfig::from_args(&args, 3);

        assert_eq!(config.env.preprocessing, Preprocessing::Pong);
        assert_eq!(config.model.n_actions, 3);
        assert_eq!(config.model.max_grad_norm, None);
        assert_eq!(config.model.weight_init, WeightInit::Glorot);
        assert_eq!(config.trainer.n_workers, 3);
        assert_eq!(config.trainer.lr_schedule.kind, LrScheduleKind::Linear);
        assert_eq!(config.trainer.lr_schedule.zero_by_steps, Some(2000));
        assert_eq!(
            config.trainer.model_dir,
            Some(Path::new("logs").join("test").to_string_lossy().into_owned())
        );
        config.trainer.validate()?;
        Ok(())
    }

    #[test]
    fn test_invalid_schedule_is_rejected() -> Result<()> {
        let args = Args::try_parse_from(["hogwild", "--lr-schedule", "linear"])?;
        let config = HogwildConfig::from_args(&args, 3);
        assert!(config.trainer.validate().is_err());
        Ok(())
    }

    #[test]
    fn test_run_dir_is_not_reused() -> Result<()> {
        let dir = TempDir::new("run_dir")?;
        let args = Args::try_parse_from([
            "hogwild",
            "--log-dir",
            &dir.path().to_string_lossy(),
            "--run-name",
            "run",
        ])?;
        let run = run_dir(&args);
        create_run_dir(&run)?;
        assert!(run.is_dir());
        assert!(create_run_dir(&run).is_err());
        Ok(())
    }

    #[test]
    fn test_serde_hogwild_config() -> Result<()> {
        let args = Args::try_parse_from(["hogwild", "--run-name", "serde"])?;
        let config = HogwildConfig::from_args(&args, 3);

        let dir = TempDir::new("hogwild_config")?;
        let path = dir.path().join("config.yaml");
        config.save(&path)?;
        assert_eq!(config, HogwildConfig::load(&path)?);
        Ok(())
    }
}
