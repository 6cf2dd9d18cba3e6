//! Optimizers.
use anyhow::Result;
use hogwild_core::{GradientBuffer, ParamSpec, SharedOptimizer, SharedParams};
use serde::{Deserialize, Serialize};

/// Configuration of [`RmsProp`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RmsPropConfig {
    /// Decay of the mean-square statistics.
    #[serde(default = "default_decay")]
    pub decay: f32,

    /// Added inside the square root.
    #[serde(default = "default_eps")]
    pub eps: f32,
}

fn default_decay() -> f32 {
    0.99
}

fn default_eps() -> f32 {
    1e-5
}

impl Default for RmsPropConfig {
    fn default() -> Self {
        Self {
            decay: default_decay(),
            eps: default_eps(),
        }
    }
}

impl RmsPropConfig {
    /// Sets the decay.
    pub fn decay(mut self, v: f32) -> Self {
        self.decay = v;
        self
    }

    /// Sets epsilon.
    pub fn eps(mut self, v: f32) -> Self {
        self.eps = v;
        self
    }

    /// Builds the optimizer for parameters of the given shapes.
    pub fn build(&self, specs: &[ParamSpec]) -> RmsProp {
        let mean_square = SharedParams::new(specs);
        for (t, spec) in specs.iter().enumerate() {
            for i in 0..spec.numel() {
                mean_square.set(t, i, 1.0);
            }
        }
        RmsProp {
            decay: self.decay,
            eps: self.eps,
            mean_square,
        }
    }
}

/// RMSProp whose mean-square statistics are shared by every worker.
///
/// ```text
/// ms    <- decay * ms + (1 - decay) * g^2
/// param <- param - lr * g / sqrt(ms + eps)
/// ```
///
/// The statistics start at one. Both updates are per-element atomic adds,
/// so concurrent workers may interleave between reading `ms` and applying
/// the step.
pub struct RmsProp {
    decay: f32,
    eps: f32,
    mean_square: SharedParams,
}

impl RmsProp {
    /// The mean-square statistics.
    pub fn mean_square(&self) -> &SharedParams {
        &self.mean_square
    }
}

impl SharedOptimizer for RmsProp {
    fn apply(&self, grads: &GradientBuffer, params: &SharedParams, lr: f32) -> Result<()> {
        params.check_specs(grads.specs())?;
        self.mean_square.check_specs(grads.specs())?;

        for (t, g) in grads.values().iter().enumerate() {
            for (i, &g) in g.iter().enumerate() {
                let ms = self.mean_square.get(t, i);
                let delta = (1.0 - self.decay) * (g * g - ms);
                self.mean_square.add(t, i, delta);
                let ms = ms + delta;
                params.add(t, i, -lr * g / (ms + self.eps).sqrt());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hogwild_core::GradientSet;
    use std::{sync::Arc, thread};

    fn specs() -> Vec<ParamSpec> {
        vec![ParamSpec::new("w", &[2])]
    }

    #[test]
    fn test_rmsprop_step() -> Result<()> {
        let opt = RmsPropConfig::default().decay(0.5).eps(0.0).build(&specs());
        let params = SharedParams::from_values(&specs(), &[vec![0.0, 0.0]])?;
        let mut grads = GradientBuffer::new(&specs());
        grads.accumulate(&GradientSet(vec![vec![1.0, -3.0]]))?;

        opt.apply(&grads, &params, 0.1)?;

        // ms = 0.5 * 1 + 0.5 * g^2
        let ms = opt.mean_square().to_values();
        assert_eq!(ms, vec![vec![1.0, 5.0]]);
        let p = params.to_values();
        assert!((p[0][0] + 0.1).abs() < 1e-6);
        assert!((p[0][1] - 0.3 / 5f32.sqrt()).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_rmsprop_rejects_mismatch() {
        let opt = RmsPropConfig::default().build(&specs());
        let params = SharedParams::new(&[ParamSpec::new("w", &[3])]);
        let grads = GradientBuffer::new(&[ParamSpec::new("w", &[3])]);
        assert!(opt.apply(&grads, &params, 0.1).is_err());
    }

    #[test]
    fn test_rmsprop_concurrent_descent() -> Result<()> {
        // Minimises (w - 2)^2 from several threads at once
        let opt = Arc::new(RmsPropConfig::default().build(&specs()));
        let params = Arc::new(SharedParams::from_values(&specs(), &[vec![0.0, 0.0]])?);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let opt = opt.clone();
                let params = params.clone();
                thread::spawn(move || -> Result<()> {
                    let mut grads = GradientBuffer::new(&specs());
                    let mut local = vec![vec![0.0; 2]];
                    for _ in 0..500 {
                        params.copy_to(&mut local)?;
                        let g = local[0].iter().map(|w| 2.0 * (w - 2.0)).collect();
                        grads.zero();
                        grads.accumulate(&GradientSet(vec![g]))?;
                        opt.apply(&grads, &params, 0.01)?;
                    }
                    Ok(())
                })
            })
            .collect();
        for h in handles {
            h.join().expect("optimizer thread panicked")?;
        }

        for w in params.to_values()[0].iter() {
            assert!((w - 2.0).abs() < 0.1, "{}", w);
        }
        Ok(())
    }
}
