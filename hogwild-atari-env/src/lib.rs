#![warn(missing_docs)]
//! Frame preprocessing and Atari-style environments.
//!
//! Raw emulator screens go through a fixed chain of stages before the agent
//! sees them. For the generic variant:
//!
//! 1. [`MaxFrames`](stage::MaxFrames): elementwise max over the two most
//!    recent frames.
//! 2. [`LuminanceScale`](stage::LuminanceScale): luminance, bilinear rescale
//!    to 84x84.
//! 3. [`Normalize`](stage::Normalize): intensities to `[0, 1]`.
//! 4. [`FrameSkip`](stage::FrameSkip): repeat each action 4 times.
//! 5. [`FrameStack`](stage::FrameStack): the 4 most recent frames.
//!
//! Skipping happens before stacking, so one observation covers 16 emulator
//! frames. The Pong variant replaces 1-3 with
//! [`PongFeatures`](stage::PongFeatures).
//!
//! Games are either the built-in [`CatchEnv`], which needs no native
//! library, or Atari 2600 ROMs emulated by the Arcade Learning Environment
//! (the `ale` feature). ROM images are looked up under the directory given
//! by `ATARI_ROM_DIR`.
//!
//! ```bash
//! pip install autorom
//! mkdir $HOME/atari_rom
//! AutoROM --install-dir $HOME/atari_rom
//! export ATARI_ROM_DIR=$HOME/atari_rom
//! ```
//!
//! ```no_run
//! use anyhow::Result;
//! use hogwild_atari_env::{AtariEnv, AtariEnvConfig, Preprocessing};
//! use hogwild_core::{BuildEnv, Env};
//!
//! fn main() -> Result<()> {
//!     let config = AtariEnvConfig::default()
//!         .name("catch")
//!         .preprocessing(Preprocessing::Generic);
//!     let mut env = AtariEnv::build(&config, 42)?;
//!     let obs = env.reset()?;
//!     assert_eq!(obs.dim(), (4, 84, 84));
//!     let (_step, _record) = env.step(0)?;
//!     Ok(())
//! }
//! ```
#[cfg(feature = "ale")]
pub mod ale;
pub mod catch;
mod env;
pub mod frame;
mod pipeline;
pub mod stage;
pub mod util;
pub use catch::{CatchConfig, CatchEnv};
pub use env::{AtariEnv, AtariEnvConfig, CATCH};
pub use frame::{FrameRing, FrameStackObs, GrayFrame, RgbFrame, UnitFrame};
pub use pipeline::{BoxedEnv, Preprocessing, FRAME_SIZE, STACK_DEPTH};
