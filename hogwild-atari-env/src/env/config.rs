//! Configuration of [`AtariEnv`](super::AtariEnv).
//!
//! If the environment variable `ATARI_ROM_DIR` is set, it is used as the
//! directory from which ROM images are loaded. Otherwise `$HOME/atari_rom`.
use crate::{catch::CatchConfig, pipeline::Preprocessing};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    env,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Name of the built-in game that needs no ROM.
pub const CATCH: &str = "catch";

/// Configuration of [`AtariEnv`](super::AtariEnv).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AtariEnvConfig {
    /// Game name: [`CATCH`] or the stem of a ROM file in `rom_dir`.
    pub name: String,

    /// Directory of ROM images.
    pub rom_dir: String,

    /// Preprocessing variant.
    pub preprocessing: Preprocessing,

    /// Number of emulator frames per agent step.
    pub frame_skip: usize,

    /// Upper bound of random no-op actions at the start of an episode.
    pub max_n_noops: usize,

    /// Parameters of the built-in game.
    pub catch: CatchConfig,
}

fn default_rom_dir() -> String {
    if let Ok(var) = env::var("ATARI_ROM_DIR") {
        var
    } else {
        dirs::home_dir()
            .map(|d| d.join("atari_rom").to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl Default for AtariEnvConfig {
    fn default() -> Self {
        Self {
            name: CATCH.to_string(),
            rom_dir: default_rom_dir(),
            preprocessing: Preprocessing::Generic,
            frame_skip: 4,
            max_n_noops: 30,
            catch: CatchConfig::default(),
        }
    }
}

impl AtariEnvConfig {
    /// Sets the name of the game.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the ROM directory.
    pub fn rom_dir(mut self, rom_dir: impl Into<String>) -> Self {
        self.rom_dir = rom_dir.into();
        self
    }

    /// Sets the preprocessing variant.
    pub fn preprocessing(mut self, preprocessing: Preprocessing) -> Self {
        self.preprocessing = preprocessing;
        self
    }

    /// Sets the number of emulator frames per agent step.
    pub fn frame_skip(mut self, frame_skip: usize) -> Self {
        self.frame_skip = frame_skip;
        self
    }

    /// Sets the upper bound of random no-op actions at reset.
    pub fn max_n_noops(mut self, max_n_noops: usize) -> Self {
        self.max_n_noops = max_n_noops;
        self
    }

    /// Loads the configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves the configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
