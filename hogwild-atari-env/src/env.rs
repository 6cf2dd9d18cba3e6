mod config;
use crate::{
    catch::CatchEnv,
    frame::{FrameStackObs, RgbFrame},
    pipeline::BoxedEnv,
    stage::{EpisodeMonitor, NoopReset},
};
use anyhow::Result;
use hogwild_core::{record::Record, BuildEnv, Env, Step};
use log::info;
pub use config::{AtariEnvConfig, CATCH};

/// A raw emulator: the built-in Catch game or, with the `ale` feature, an
/// Atari 2600 ROM.
fn emulator(config: &AtariEnvConfig, seed: i64) -> Result<Box<dyn Env<Obs = RgbFrame> + Send>> {
    if config.name == CATCH {
        return Ok(Box::new(CatchEnv::new(config.catch.clone(), seed as u64)?));
    }
    ale_emulator(config, seed)
}

#[cfg(feature = "ale")]
fn ale_emulator(config: &AtariEnvConfig, seed: i64) -> Result<Box<dyn Env<Obs = RgbFrame> + Send>> {
    let rom_dir = std::path::Path::new(&config.rom_dir);
    Ok(Box::new(crate::ale::AleEnv::new(rom_dir, &config.name, seed)?))
}

#[cfg(not(feature = "ale"))]
fn ale_emulator(config: &AtariEnvConfig, _seed: i64) -> Result<Box<dyn Env<Obs = RgbFrame> + Send>> {
    Err(hogwild_core::error::HogwildError::InvalidConfig(format!(
        "'{}' needs the Arcade Learning Environment; rebuild with the `ale` feature",
        config.name
    ))
    .into())
}

/// A preprocessed Atari-style environment.
///
/// Stages, innermost first: random no-op starts on the raw emulator, the
/// configured [`Preprocessing`](crate::Preprocessing) variant, and an
/// [`EpisodeMonitor`] reporting episode summaries.
pub struct AtariEnv {
    env: EpisodeMonitor<BoxedEnv>,
}

impl AtariEnv {
    /// Number of episodes started so far.
    pub fn episode_n(&self) -> usize {
        self.env.episode_n()
    }
}

impl Env for AtariEnv {
    type Obs = FrameStackObs;

    fn reset(&mut self) -> Result<Self::Obs> {
        self.env.reset()
    }

    fn step(&mut self, act: usize) -> Result<(Step<Self::Obs>, Record)> {
        self.env.step(act)
    }

    fn action_meanings(&self) -> Vec<String> {
        self.env.action_meanings()
    }
}

impl BuildEnv for AtariEnv {
    type Config = AtariEnvConfig;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        info!("Building environment '{}' with seed {}", config.name, seed);
        let raw = emulator(config, seed)?;
        let raw = NoopReset::new(raw, config.max_n_noops, seed as u64)?;
        let env = config.preprocessing.wrap(raw, config.frame_skip)?;
        Ok(Self {
            env: EpisodeMonitor::new(env),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{pipeline::{FRAME_SIZE, STACK_DEPTH}, Preprocessing};

    #[test]
    fn test_build_catch() -> Result<()> {
        for preprocessing in [Preprocessing::Generic, Preprocessing::Pong] {
            let config = AtariEnvConfig::default().preprocessing(preprocessing);
            let mut env = AtariEnv::build(&config, 0)?;
            assert_eq!(env.n_actions(), 3);

            let obs = env.reset()?;
            assert_eq!(obs.dim(), (STACK_DEPTH, FRAME_SIZE, FRAME_SIZE));
            assert!(obs.iter().all(|&x| (0.0..=1.0).contains(&x)));

            let (step, _) = env.step(1)?;
            assert_eq!(step.obs.dim(), (STACK_DEPTH, FRAME_SIZE, FRAME_SIZE));
        }
        Ok(())
    }

    #[cfg(not(feature = "ale"))]
    #[test]
    fn test_rom_needs_ale_feature() {
        let config = AtariEnvConfig::default().name("pong");
        assert!(AtariEnv::build(&config, 0).is_err());
    }
}
