//! Configuration of [`CnnActorCritic`](super::CnnActorCritic).
use super::WeightInit;
use crate::{cnn::CnnConfig, Device};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`CnnActorCritic`](super::CnnActorCritic).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ActorCriticConfig {
    /// Convolutional torso.
    pub cnn: CnnConfig,

    /// Number of actions.
    pub n_actions: usize,

    /// Weight of the value loss relative to the policy loss.
    pub value_loss_coef: f32,

    /// Weight of the entropy bonus.
    pub entropy_bonus: f32,

    /// Upper bound of the global gradient norm of one update.
    pub max_grad_norm: Option<f32>,

    /// Weight initialisation.
    #[serde(default)]
    pub weight_init: WeightInit,

    /// Device.
    pub device: Device,
}

impl Default for ActorCriticConfig {
    fn default() -> Self {
        Self {
            cnn: CnnConfig::default(),
            n_actions: 0,
            value_loss_coef: 0.5,
            entropy_bonus: 0.01,
            max_grad_norm: Some(0.5),
            weight_init: WeightInit::default(),
            device: Device::Cpu,
        }
    }
}

impl ActorCriticConfig {
    /// Sets the configuration of the torso.
    pub fn cnn(mut self, v: CnnConfig) -> Self {
        self.cnn = v;
        self
    }

    /// Sets the number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the value loss coefficient.
    pub fn value_loss_coef(mut self, v: f32) -> Self {
        self.value_loss_coef = v;
        self
    }

    /// Sets the entropy bonus.
    pub fn entropy_bonus(mut self, v: f32) -> Self {
        self.entropy_bonus = v;
        self
    }

    /// Sets the gradient norm bound.
    pub fn max_grad_norm(mut self, v: Option<f32>) -> Self {
        self.max_grad_norm = v;
        self
    }

    /// Sets the weight initialisation.
    pub fn weight_init(mut self, v: WeightInit) -> Self {
        self.weight_init = v;
        self
    }

    /// Sets the device.
    pub fn device(mut self, v: Device) -> Self {
        self.device = v;
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

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_actor_critic_config() -> Result<()> {
        let config = ActorCriticConfig::default()
            .n_actions(6)
            .entropy_bonus(0.02)
            .max_grad_norm(None)
            .weight_init(WeightInit::Glorot);

        let dir = TempDir::new("actor_critic_config")?;
        let path = dir.path().join("actor_critic_config.yaml");
        config.save(&path)?;
        assert_eq!(config, ActorCriticConfig::load(&path)?);
        Ok(())
    }
}
