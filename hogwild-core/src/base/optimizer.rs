//! Optimizers applying local gradients to the shared parameters.
use crate::{GradientBuffer, SharedParams};
use anyhow::Result;

/// Applies gradients to [`SharedParams`] without locking.
///
/// Implementations are shared by all workers, so any internal statistics
/// must themselves tolerate concurrent unsynchronised updates.
pub trait SharedOptimizer: Send + Sync {
    /// Takes one descent step with learning rate `lr`.
    fn apply(&self, grads: &GradientBuffer, params: &SharedParams, lr: f32) -> Result<()>;
}

/// Plain stochastic gradient descent.
#[derive(Clone, Debug, Default)]
pub struct Sgd;

impl SharedOptimizer for Sgd {
    fn apply(&self, grads: &GradientBuffer, params: &SharedParams, lr: f32) -> Result<()> {
        params.check_specs(grads.specs())?;
        for (t, g) in grads.values().iter().enumerate() {
            for (i, g) in g.iter().enumerate() {
                params.add(t, i, -lr * g);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{GradientSet, ParamSpec};

    #[test]
    fn test_sgd() -> Result<()> {
        let specs = vec![ParamSpec::new("w", &[2])];
        let params = SharedParams::from_values(&specs, &[vec![1.0, 1.0]])?;
        let mut grads = GradientBuffer::new(&specs);
        grads.accumulate(&GradientSet(vec![vec![2.0, -4.0]]))?;

        Sgd.apply(&grads, &params, 0.5)?;
        assert_eq!(params.to_values(), vec![vec![0.0, 3.0]]);

        let other = GradientBuffer::new(&[ParamSpec::new("v", &[2])]);
        assert!(Sgd.apply(&other, &params, 0.5).is_err());
        Ok(())
    }
}
