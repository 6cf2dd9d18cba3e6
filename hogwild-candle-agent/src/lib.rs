//! Actor-critic model and optimizer implemented with
//! [candle](https://crates.io/crates/candle-core).
//!
//! [`CnnActorCritic`] is the policy/value capability workers use to pick
//! actions and compute gradients. [`RmsProp`](opt::RmsProp) applies those
//! gradients to the shared parameters, keeping its own statistics shared
//! between workers as well.
pub mod actor_critic;
pub mod cnn;
pub mod model;
pub mod opt;
pub use actor_critic::{ActorCriticConfig, CnnActorCritic, WeightInit};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Copy, Deserialize, Serialize, PartialEq)]
/// Device for using candle.
///
/// This enum is added because [`candle_core::Device`] does not support serialization.
pub enum Device {
    /// The main CPU device.
    Cpu,

    /// The main GPU device.
    Cuda(usize),
}

impl Default for Device {
    fn default() -> Self {
        Self::Cpu
    }
}

impl TryFrom<Device> for candle_core::Device {
    type Error = candle_core::Error;

    fn try_from(device: Device) -> Result<Self, Self::Error> {
        match device {
            Device::Cpu => Ok(candle_core::Device::Cpu),
            Device::Cuda(n) => candle_core::Device::new_cuda(n),
        }
    }
}
