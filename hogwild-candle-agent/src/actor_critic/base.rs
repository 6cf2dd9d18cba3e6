use super::ActorCriticConfig;
use crate::{cnn::Cnn, model::SubModel1};
use anyhow::{anyhow, bail, Result};
use candle_core::{DType, Device, Tensor, Var, D};
use candle_nn::{
    linear,
    ops::{log_softmax, softmax},
    Linear, Module, VarBuilder, VarMap,
};
use hogwild_core::{
    record::{Record, RecordValue},
    ActorCritic, GradientSet, ParamSpec, Prediction,
};
use ndarray::Array3;

/// Policy and value heads on a shared [`Cnn`] torso.
///
/// Loss of a batch of `n` transitions with returns `R` and values `V`:
///
/// ```text
/// policy  = -mean(log pi(a|s) * (R - V))     (V treated as a constant)
/// value   =  mean((R - V)^2)
/// entropy =  mean(H(pi(.|s)))
/// loss    =  policy + value_loss_coef * value - entropy_bonus * entropy
/// ```
pub struct CnnActorCritic {
    config: ActorCriticConfig,
    device: Device,
    cnn: Cnn,
    policy: Linear,
    value: Linear,
    // Sorted by name so that every worker sees the same order
    vars: Vec<(String, Var)>,
}

impl CnnActorCritic {
    fn obs_to_tensor(&self, obs: &[Array3<f32>]) -> Result<Tensor> {
        let c = &self.config.cnn;
        let shape = (c.n_stack, c.frame_size, c.frame_size);
        let mut data = Vec::with_capacity(obs.len() * shape.0 * shape.1 * shape.2);
        for o in obs.iter() {
            if o.dim() != shape {
                bail!("Expected observations of shape {:?}, got {:?}", shape, o.dim());
            }
            data.extend(o.iter().copied());
        }
        Ok(Tensor::from_vec(
            data,
            (obs.len(), shape.0, shape.1, shape.2),
            &self.device,
        )?)
    }

    /// Logits `(n, n_actions)` and values `(n,)`.
    fn forward(&self, xs: &Tensor) -> Result<(Tensor, Tensor)> {
        let h = self.cnn.forward(xs)?;
        let logits = self.policy.forward(&h)?;
        let values = self.value.forward(&h)?.squeeze(1)?;
        Ok((logits, values))
    }

    /// The configuration.
    pub fn config(&self) -> &ActorCriticConfig {
        &self.config
    }
}

impl ActorCritic<Array3<f32>> for CnnActorCritic {
    type Config = ActorCriticConfig;

    fn build(config: ActorCriticConfig) -> Result<Self> {
        if config.n_actions == 0 {
            bail!("The model needs at least one action");
        }
        let device: Device = config.device.try_into()?;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);

        let feature_dim = config.cnn.feature_dim;
        let cnn = Cnn::build(vb.pp("cnn"), config.cnn.clone())?;
        let policy = linear(feature_dim, config.n_actions, vb.pp("policy"))?;
        let value = linear(feature_dim, 1, vb.pp("value"))?;

        let mut vars: Vec<(String, Var)> = varmap
            .data()
            .lock()
            .map_err(|_| anyhow!("VarMap lock poisoned"))?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        config.weight_init.apply(&vars)?;

        Ok(Self {
            config,
            device,
            cnn,
            policy,
            value,
            vars,
        })
    }

    fn predict(&self, obs: &Array3<f32>) -> Result<Prediction> {
        let xs = self.obs_to_tensor(std::slice::from_ref(obs))?;
        let (logits, values) = self.forward(&xs)?;
        let action_probs = softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()?;
        let value = values.squeeze(0)?.to_scalar::<f32>()?;
        Ok(Prediction {
            action_probs,
            value,
        })
    }

    fn compute_gradients(
        &self,
        obs: &[Array3<f32>],
        acts: &[usize],
        returns: &[f32],
    ) -> Result<(GradientSet, Record)> {
        let n = obs.len();
        if n == 0 || acts.len() != n || returns.len() != n {
            bail!(
                "Mismatched batch: {} observations, {} actions, {} returns",
                n,
                acts.len(),
                returns.len()
            );
        }
        if let Some(a) = acts.iter().find(|&&a| a >= self.config.n_actions) {
            bail!("Action {} out of range", a);
        }

        let xs = self.obs_to_tensor(obs)?;
        let (logits, values) = self.forward(&xs)?;
        let log_probs = log_softmax(&logits, D::Minus1)?;
        let probs = log_probs.exp()?;

        let acts = Tensor::from_iter(acts.iter().map(|&a| a as u32), &self.device)?.unsqueeze(1)?;
        let log_pi_a = log_probs.gather(&acts, 1)?.squeeze(1)?;
        let returns = Tensor::from_slice(returns, n, &self.device)?;

        let advantages = (&returns - &values.detach())?;
        let policy_loss = (log_pi_a * advantages)?.mean_all()?.neg()?;
        let value_loss = (&returns - &values)?.sqr()?.mean_all()?;
        let entropy = (&probs * &log_probs)?.sum(1)?.neg()?.mean_all()?;

        let loss = ((&policy_loss + value_loss.affine(self.config.value_loss_coef as f64, 0.0)?)?
            - entropy.affine(self.config.entropy_bonus as f64, 0.0)?)?;
        let grads = loss.backward()?;

        let grads = self
            .vars
            .iter()
            .map(|(_, var)| match grads.get(var.as_tensor()) {
                Some(g) => Ok(g.flatten_all()?.to_vec1::<f32>()?),
                None => Ok(vec![0.0; var.elem_count()]),
            })
            .collect::<Result<Vec<_>>>()?;

        let record = Record::from_slice(&[
            ("loss/policy", RecordValue::Scalar(policy_loss.to_scalar::<f32>()?)),
            ("loss/value", RecordValue::Scalar(value_loss.to_scalar::<f32>()?)),
            ("loss/entropy", RecordValue::Scalar(entropy.to_scalar::<f32>()?)),
        ]);

        Ok((GradientSet(grads), record))
    }

    fn param_specs(&self) -> Vec<ParamSpec> {
        self.vars
            .iter()
            .map(|(name, var)| ParamSpec::new(name.clone(), var.dims()))
            .collect()
    }

    fn params(&self) -> Result<Vec<Vec<f32>>> {
        self.vars
            .iter()
            .map(|(_, var)| Ok(var.as_tensor().flatten_all()?.to_vec1::<f32>()?))
            .collect()
    }

    fn load_params(&mut self, values: &[Vec<f32>]) -> Result<()> {
        if values.len() != self.vars.len() {
            bail!("Expected {} tensors, got {}", self.vars.len(), values.len());
        }
        for ((name, var), v) in self.vars.iter().zip(values.iter()) {
            if v.len() != var.elem_count() {
                bail!("{} has {} elements, got {}", name, var.elem_count(), v.len());
            }
            let t = Tensor::from_slice(v, var.dims(), &self.device)?;
            var.set(&t)?;
        }
        Ok(())
    }

    fn max_grad_norm(&self) -> Option<f32> {
        self.config.max_grad_norm
    }
}
