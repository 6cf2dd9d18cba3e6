//! Learning rate schedules driven by the global step count.
use crate::error::HogwildError;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Shape of the schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LrScheduleKind {
    /// Keep the initial rate.
    Constant,

    /// Decay linearly to zero.
    Linear,
}

/// Configuration of [`LrSchedule`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LrScheduleConfig {
    /// Learning rate at step 0.
    pub initial: f32,

    /// Shape of the schedule.
    pub kind: LrScheduleKind,

    /// Step at which a linear schedule reaches zero.
    pub zero_by_steps: Option<u64>,
}

impl Default for LrScheduleConfig {
    fn default() -> Self {
        Self {
            initial: 5e-4,
            kind: LrScheduleKind::Constant,
            zero_by_steps: None,
        }
    }
}

impl LrScheduleConfig {
    /// Constant schedule.
    pub fn constant(initial: f32) -> Self {
        Self {
            initial,
            kind: LrScheduleKind::Constant,
            zero_by_steps: None,
        }
    }

    /// Linear decay reaching zero at `zero_by_steps`.
    pub fn linear(initial: f32, zero_by_steps: u64) -> Self {
        Self {
            initial,
            kind: LrScheduleKind::Linear,
            zero_by_steps: Some(zero_by_steps),
        }
    }

    /// Checks the schedule against the total step budget `n_steps`.
    ///
    /// A linear schedule needs a decay target of at least `n_steps`; a
    /// constant one must not have a decay target at all.
    pub fn validate(&self, n_steps: u64) -> Result<(), HogwildError> {
        if !(self.initial >= 0.0) {
            return Err(HogwildError::InvalidLrSchedule(format!(
                "initial learning rate must be non-negative, got {}",
                self.initial
            )));
        }
        match (self.kind, self.zero_by_steps) {
            (LrScheduleKind::Linear, None) => Err(HogwildError::InvalidLrSchedule(
                "linear schedule requires a decay target".to_string(),
            )),
            (LrScheduleKind::Linear, Some(z)) if z < n_steps => {
                Err(HogwildError::InvalidLrSchedule(format!(
                    "decay target ({}) must be at least the step budget ({})",
                    z, n_steps
                )))
            }
            (LrScheduleKind::Constant, Some(_)) => Err(HogwildError::InvalidLrSchedule(
                "decay target is only relevant for a linear schedule".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// A learning rate as a function of the global step count.
#[derive(Clone, Debug)]
pub enum LrSchedule {
    /// Fixed rate.
    Constant(f32),

    /// `initial * (1 - step / zero_by_steps)`, clamped at zero.
    Linear {
        /// Rate at step 0.
        initial: f32,
        /// Step at which the rate reaches zero.
        zero_by_steps: u64,
    },
}

impl LrSchedule {
    /// Builds a validated schedule.
    pub fn build(config: &LrScheduleConfig, n_steps: u64) -> Result<Self> {
        config.validate(n_steps)?;
        Ok(match (config.kind, config.zero_by_steps) {
            (LrScheduleKind::Linear, Some(zero_by_steps)) => Self::Linear {
                initial: config.initial,
                zero_by_steps,
            },
            _ => Self::Constant(config.initial),
        })
    }

    /// Learning rate at global step `step`.
    pub fn lr(&self, step: u64) -> f32 {
        match self {
            Self::Constant(lr) => *lr,
            Self::Linear {
                initial,
                zero_by_steps,
            } => {
                if *zero_by_steps == 0 {
                    return 0.0;
                }
                let frac = 1.0 - step as f64 / *zero_by_steps as f64;
                (*initial as f64 * frac).max(0.0) as f32
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_constant() -> Result<()> {
        let sched = LrSchedule::build(&LrScheduleConfig::constant(1e-3), 100)?;
        assert_eq!(sched.lr(0), 1e-3);
        assert_eq!(sched.lr(1_000_000), 1e-3);
        Ok(())
    }

    #[test]
    fn test_linear() -> Result<()> {
        let sched = LrSchedule::build(&LrScheduleConfig::linear(1.0, 200), 100)?;
        assert_eq!(sched.lr(0), 1.0);
        assert!((sched.lr(50) - 0.75).abs() < 1e-6);
        assert_eq!(sched.lr(200), 0.0);
        assert_eq!(sched.lr(300), 0.0);
        Ok(())
    }

    #[test]
    fn test_invalid() {
        let linear_without_target = LrScheduleConfig {
            initial: 1.0,
            kind: LrScheduleKind::Linear,
            zero_by_steps: None,
        };
        assert!(linear_without_target.validate(10).is_err());
        assert!(LrScheduleConfig::linear(1.0, 5).validate(10).is_err());
        assert!(LrScheduleConfig::linear(1.0, 10).validate(10).is_ok());

        let constant_with_target = LrScheduleConfig {
            zero_by_steps: Some(10),
            ..LrScheduleConfig::constant(1.0)
        };
        assert!(constant_with_target.validate(10).is_err());
    }
}
