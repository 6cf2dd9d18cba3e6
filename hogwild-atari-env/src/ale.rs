//! Arcade Learning Environment adapter.
//!
//! Requires the `ale` feature, which links the ALE C++ library through
//! `atari-env-sys`. ROM images are looked up as `{rom_dir}/{name}.bin`.
use crate::frame::RgbFrame;
use anyhow::{anyhow, Context, Result};
use c_str_macro::c_str;
use hogwild_core::{error::HogwildError, record::Record, Env, Step};
use ndarray::Array3;
use std::{ffi::CString, path::Path};
use strum::IntoStaticStr;

/// Joystick inputs, numbered as in ALE.
#[derive(Copy, Clone, Debug, PartialEq, Eq, IntoStaticStr)]
#[repr(i32)]
#[strum(serialize_all = "UPPERCASE")]
pub enum AleAction {
    Noop = 0,
    Fire = 1,
    Up = 2,
    Right = 3,
    Left = 4,
    Down = 5,
    UpRight = 6,
    UpLeft = 7,
    DownRight = 8,
    DownLeft = 9,
    UpFire = 10,
    RightFire = 11,
    LeftFire = 12,
    DownFire = 13,
    UpRightFire = 14,
    UpLeftFire = 15,
    DownRightFire = 16,
    DownLeftFire = 17,
}

impl AleAction {
    const ALL: [AleAction; 18] = [
        AleAction::Noop,
        AleAction::Fire,
        AleAction::Up,
        AleAction::Right,
        AleAction::Left,
        AleAction::Down,
        AleAction::UpRight,
        AleAction::UpLeft,
        AleAction::DownRight,
        AleAction::DownLeft,
        AleAction::UpFire,
        AleAction::RightFire,
        AleAction::LeftFire,
        AleAction::DownFire,
        AleAction::UpRightFire,
        AleAction::UpLeftFire,
        AleAction::DownRightFire,
        AleAction::DownLeftFire,
    ];

    fn from_i32(v: i32) -> Option<Self> {
        usize::try_from(v).ok().and_then(|i| Self::ALL.get(i).copied())
    }
}

struct Ale {
    inner: *mut atari_env_sys::ALEInterface,
}

// The interface is only ever touched by the thread owning the environment.
unsafe impl Send for Ale {}

impl Drop for Ale {
    fn drop(&mut self) {
        unsafe {
            atari_env_sys::ALE_del(self.inner);
        }
    }
}

impl Ale {
    fn new(rom_path: &Path, seed: i32) -> Result<Self> {
        let rom_path = CString::new(
            rom_path
                .to_str()
                .ok_or_else(|| anyhow!("ROM path {:?} is not valid UTF-8", rom_path))?,
        )?;
        let ale = unsafe { atari_env_sys::ALE_new() };
        unsafe {
            atari_env_sys::setInt(ale, c_str!("random_seed").as_ptr(), seed);
            atari_env_sys::setBool(ale, c_str!("display_screen").as_ptr(), false);
            atari_env_sys::setBool(ale, c_str!("sound").as_ptr(), false);
            atari_env_sys::setBool(ale, c_str!("color_averaging").as_ptr(), false);
            // Frame skipping and maxing happen in the preprocessing stages
            atari_env_sys::setInt(ale, c_str!("frame_skip").as_ptr(), 1);
            atari_env_sys::setFloat(ale, c_str!("repeat_action_probability").as_ptr(), 0.0);
            atari_env_sys::loadROM(ale, rom_path.as_ptr());
            atari_env_sys::reset_game(ale);
        }
        Ok(Self { inner: ale })
    }

    fn minimal_actions(&self) -> Vec<i32> {
        let n = unsafe { atari_env_sys::getMinimalActionSize(self.inner) } as usize;
        let mut buf = vec![0i32; n];
        unsafe {
            atari_env_sys::getMinimalActionSet(self.inner, buf.as_mut_ptr());
        }
        buf
    }

    fn is_game_over(&self) -> bool {
        unsafe { atari_env_sys::game_over(self.inner) }
    }

    fn reset(&mut self) {
        unsafe {
            atari_env_sys::reset_game(self.inner);
        }
    }

    fn act(&mut self, action: AleAction) -> i32 {
        unsafe { atari_env_sys::act(self.inner, action as i32) }
    }

    fn width(&self) -> usize {
        unsafe { atari_env_sys::getScreenWidth(self.inner) as usize }
    }

    fn height(&self) -> usize {
        unsafe { atari_env_sys::getScreenHeight(self.inner) as usize }
    }

    /// RGB regardless of endianness.
    fn rgb24(&self, buf: &mut [u8]) {
        unsafe {
            atari_env_sys::getScreenRGB2(self.inner, buf.as_mut_ptr());
        }
    }
}

/// An Atari 2600 game emulated by ALE, restricted to its minimal action set.
pub struct AleEnv {
    ale: Ale,
    actions: Vec<AleAction>,
}

impl AleEnv {
    /// Loads `{rom_dir}/{name}.bin`.
    pub fn new(rom_dir: &Path, name: &str, seed: i64) -> Result<Self> {
        let rom_path = rom_dir.join(format!("{}.bin", name));
        if !rom_path.exists() {
            return Err(HogwildError::InvalidConfig(format!(
                "ROM image {:?} not found; set ATARI_ROM_DIR",
                rom_path
            ))
            .into());
        }
        let ale = Ale::new(&rom_path, seed as i32)
            .with_context(|| format!("Failed to load {:?}", rom_path))?;
        let actions = ale
            .minimal_actions()
            .into_iter()
            .map(|a| AleAction::from_i32(a).ok_or_else(|| anyhow!("Unknown ALE action {}", a)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { ale, actions })
    }

    fn screen(&self) -> Result<RgbFrame> {
        let (h, w) = (self.ale.height(), self.ale.width());
        let mut buf = vec![0u8; h * w * 3];
        self.ale.rgb24(&mut buf);
        Ok(Array3::from_shape_vec((h, w, 3), buf)?)
    }
}

impl Env for AleEnv {
    type Obs = RgbFrame;

    fn reset(&mut self) -> Result<RgbFrame> {
        self.ale.reset();
        self.screen()
    }

    fn step(&mut self, act: usize) -> Result<(Step<RgbFrame>, Record)> {
        let action = *self.actions.get(act).ok_or_else(|| {
            HogwildError::InvalidConfig(format!("action index {} out of range", act))
        })?;
        let reward = self.ale.act(action) as f32;
        let is_done = self.ale.is_game_over();
        Ok((Step::new(self.screen()?, reward, is_done), Record::empty()))
    }

    fn action_meanings(&self) -> Vec<String> {
        self.actions
            .iter()
            .map(|a| <&'static str>::from(*a).to_string())
            .collect()
    }
}
