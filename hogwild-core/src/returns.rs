//! n-step discounted returns.
use crate::error::HogwildError;
use anyhow::Result;

/// Turns the rewards of a rollout into discounted returns.
#[derive(Clone, Copy, Debug)]
pub struct ReturnEstimator {
    discount: f32,
}

impl ReturnEstimator {
    /// Fails unless `0 < discount <= 1`.
    pub fn new(discount: f32) -> Result<Self> {
        if !(discount > 0.0 && discount <= 1.0) {
            return Err(HogwildError::InvalidDiscount(discount).into());
        }
        Ok(Self { discount })
    }

    /// Discount factor.
    pub fn discount(&self) -> f32 {
        self.discount
    }

    /// Computes one return per reward.
    ///
    /// If the rollout was cut short (`terminated == false`), `bootstrap_value`
    /// stands in for everything after the last reward.
    pub fn estimate(&self, rewards: &[f32], terminated: bool, bootstrap_value: f32) -> Vec<f32> {
        let mut returns = vec![0.0; rewards.len()];
        let mut acc = if terminated { 0.0 } else { bootstrap_value };
        for (r, ret) in rewards.iter().zip(returns.iter_mut()).rev() {
            acc = r + self.discount * acc;
            *ret = acc;
        }
        returns
    }
}
