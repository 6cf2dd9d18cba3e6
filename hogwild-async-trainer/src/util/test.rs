//! Small environment and model for testing the training loop without a
//! neural network backend.
use anyhow::{bail, Result};
use hogwild_core::{
    record::Record, ActorCritic, BuildEnv, Env, GradientSet, ParamSpec, Prediction, Step,
};

/// Configuration of [`Corridor`].
#[derive(Clone, Debug)]
pub struct CorridorConfig {
    /// Steps after which an episode is cut off without reward.
    pub max_steps: usize,
}

/// A walk along a line of [`Corridor::LENGTH`] cells.
///
/// Episodes start at cell 0 and end with reward 1 on reaching the last cell,
/// or with reward 0 after `max_steps` steps. Observations are one-hot
/// encodings of the current cell.
pub struct Corridor {
    config: CorridorConfig,
    pos: usize,
    n_steps: usize,
    n_resets: usize,
}

impl Corridor {
    /// Number of cells.
    pub const LENGTH: usize = 6;

    /// Index of the action moving right.
    pub const RIGHT: usize = 2;

    /// Default configuration.
    pub fn config() -> CorridorConfig {
        CorridorConfig { max_steps: 50 }
    }

    /// Observation at cell `pos`.
    pub fn one_hot(pos: usize) -> Vec<f32> {
        let mut obs = vec![0.0; Self::LENGTH];
        obs[pos] = 1.0;
        obs
    }

    /// Number of `reset()` calls so far.
    pub fn n_resets(&self) -> usize {
        self.n_resets
    }
}

impl Env for Corridor {
    type Obs = Vec<f32>;

    fn reset(&mut self) -> Result<Vec<f32>> {
        self.pos = 0;
        self.n_steps = 0;
        self.n_resets += 1;
        Ok(Self::one_hot(0))
    }

    fn step(&mut self, act: usize) -> Result<(Step<Vec<f32>>, Record)> {
        match act {
            0 => {}
            1 => self.pos = self.pos.saturating_sub(1),
            2 => self.pos += 1,
            _ => bail!("Invalid action {}", act),
        }
        self.n_steps += 1;

        let goal = self.pos == Self::LENGTH - 1;
        let reward = if goal { 1.0 } else { 0.0 };
        let is_done = goal || self.n_steps >= self.config.max_steps;
        let record = if is_done {
            Record::from_scalar("episode_length", self.n_steps as f32)
        } else {
            Record::empty()
        };
        Ok((Step::new(Self::one_hot(self.pos), reward, is_done), record))
    }

    fn action_meanings(&self) -> Vec<String> {
        ["NOOP", "LEFT", "RIGHT"].iter().map(|s| s.to_string()).collect()
    }
}

impl BuildEnv for Corridor {
    type Config = CorridorConfig;

    fn build(config: &CorridorConfig, _seed: i64) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            pos: 0,
            n_steps: 0,
            n_resets: 0,
        })
    }
}

/// Configuration of [`LinearSoftmax`].
#[derive(Clone, Debug)]
pub struct LinearSoftmaxConfig {
    /// Dimension of observations.
    pub obs_dim: usize,

    /// Number of actions.
    pub n_actions: usize,

    /// Weight of the value loss.
    pub value_loss_coef: f32,

    /// Bound on the gradient norm.
    pub max_grad_norm: Option<f32>,
}

impl LinearSoftmaxConfig {
    /// Configuration with a value loss weight of 0.5 and no clipping.
    pub fn new(obs_dim: usize, n_actions: usize) -> Self {
        Self {
            obs_dim,
            n_actions,
            value_loss_coef: 0.5,
            max_grad_norm: None,
        }
    }
}

/// Linear policy logits and linear value, with hand-written gradients.
///
/// Parameters, in order: policy bias, policy weights (`n_actions x obs_dim`),
/// value bias, value weights.
pub struct LinearSoftmax {
    config: LinearSoftmaxConfig,
    params: Vec<Vec<f32>>,
}

impl LinearSoftmax {
    /// A model that almost surely picks `act`.
    pub fn always(obs_dim: usize, n_actions: usize, act: usize) -> Self {
        let mut model = Self::new(LinearSoftmaxConfig::new(obs_dim, n_actions));
        model.params[0][act] = 50.0;
        model
    }

    fn new(config: LinearSoftmaxConfig) -> Self {
        let (d, n) = (config.obs_dim, config.n_actions);
        Self {
            params: vec![vec![0.0; n], vec![0.0; n * d], vec![0.0; 1], vec![0.0; d]],
            config,
        }
    }

    fn logits(&self, obs: &[f32]) -> Vec<f32> {
        let d = self.config.obs_dim;
        (0..self.config.n_actions)
            .map(|k| {
                let w = &self.params[1][k * d..(k + 1) * d];
                self.params[0][k] + w.iter().zip(obs).map(|(w, x)| w * x).sum::<f32>()
            })
            .collect()
    }

    fn value(&self, obs: &[f32]) -> f32 {
        self.params[2][0] + self.params[3].iter().zip(obs).map(|(w, x)| w * x).sum::<f32>()
    }
}

impl ActorCritic<Vec<f32>> for LinearSoftmax {
    type Config = LinearSoftmaxConfig;

    fn build(config: LinearSoftmaxConfig) -> Result<Self> {
        Ok(Self::new(config))
    }

    fn predict(&self, obs: &Vec<f32>) -> Result<Prediction> {
        let logits = self.logits(obs);
        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exp: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
        let z: f32 = exp.iter().sum();
        Ok(Prediction {
            action_probs: exp.iter().map(|e| e / z).collect(),
            value: self.value(obs),
        })
    }

    fn compute_gradients(
        &self,
        obs: &[Vec<f32>],
        acts: &[usize],
        returns: &[f32],
    ) -> Result<(GradientSet, Record)> {
        let d = self.config.obs_dim;
        let n = obs.len() as f32;
        let mut grads: Vec<Vec<f32>> = self.params.iter().map(|p| vec![0.0; p.len()]).collect();
        let mut value_loss = 0.0;

        for ((x, &a), &r) in obs.iter().zip(acts).zip(returns) {
            let p = self.predict(x)?;
            let adv = r - p.value;
            value_loss += adv * adv / n;

            for (k, pk) in p.action_probs.iter().enumerate() {
                let onehot = if k == a { 1.0 } else { 0.0 };
                let g = -adv * (onehot - pk) / n;
                grads[0][k] += g;
                for (j, xj) in x.iter().enumerate() {
                    grads[1][k * d + j] += g * xj;
                }
            }

            let g = -2.0 * self.config.value_loss_coef * adv / n;
            grads[2][0] += g;
            for (j, xj) in x.iter().enumerate() {
                grads[3][j] += g * xj;
            }
        }

        Ok((GradientSet(grads), Record::from_scalar("loss/value", value_loss)))
    }

    fn param_specs(&self) -> Vec<ParamSpec> {
        let (d, n) = (self.config.obs_dim, self.config.n_actions);
        vec![
            ParamSpec::new("policy.bias", &[n]),
            ParamSpec::new("policy.weight", &[n, d]),
            ParamSpec::new("value.bias", &[1]),
            ParamSpec::new("value.weight", &[1, d]),
        ]
    }

    fn params(&self) -> Result<Vec<Vec<f32>>> {
        Ok(self.params.clone())
    }

    fn load_params(&mut self, values: &[Vec<f32>]) -> Result<()> {
        if values.len() != self.params.len()
            || values.iter().zip(&self.params).any(|(v, p)| v.len() != p.len())
        {
            bail!("Parameter shapes do not match");
        }
        self.params = values.to_vec();
        Ok(())
    }

    fn max_grad_norm(&self) -> Option<f32> {
        self.config.max_grad_norm
    }
}
