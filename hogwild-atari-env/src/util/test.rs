//! Deterministic environments for testing preprocessing stages.
use crate::frame::RgbFrame;
use anyhow::Result;
use hogwild_core::{record::Record, Env, Step};
use ndarray::Array3;

/// Paints a white marker on row 10 that moves 10 pixels right every frame.
///
/// Frame `n` (counted from the reset frame, which is frame 0) has its marker
/// at column `10 * (n + 1)` modulo the screen width. The step producing
/// frame `n` is rewarded with `n`.
pub struct MovingMarkerEnv {
    n_frames: usize,
    done_at: Option<usize>,
    action_meanings: Vec<String>,
    n_resets: usize,
}

impl Default for MovingMarkerEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl MovingMarkerEnv {
    /// Screen shape, `(height, width, channels)`.
    pub const OBS_DIMS: (usize, usize, usize) = (210, 160, 3);

    /// Row of the marker.
    pub const MARKER_ROW: usize = 10;

    /// An environment whose episodes never end.
    pub fn new() -> Self {
        Self {
            n_frames: 0,
            done_at: None,
            action_meanings: vec!["NOOP".to_string()],
            n_resets: 0,
        }
    }

    /// Ends episodes with the step producing frame `n`.
    pub fn done_at(mut self, n: usize) -> Self {
        self.done_at = Some(n);
        self
    }

    /// Replaces the action names.
    pub fn action_meanings(mut self, meanings: &[&str]) -> Self {
        self.action_meanings = meanings.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Column of the marker in frame `n`.
    pub fn marker_col(n: usize) -> usize {
        (10 * (n + 1)) % Self::OBS_DIMS.1
    }

    /// Frame `n` of every episode.
    pub fn frame(n: usize) -> RgbFrame {
        let mut frame = Array3::zeros(Self::OBS_DIMS);
        let col = Self::marker_col(n);
        for c in 0..Self::OBS_DIMS.2 {
            frame[[Self::MARKER_ROW, col, c]] = 255;
        }
        frame
    }

    /// Reward of the step producing frame `n`.
    pub fn reward(n: usize) -> f32 {
        n as f32
    }

    /// Number of resets so far.
    pub fn n_resets(&self) -> usize {
        self.n_resets
    }
}

impl Env for MovingMarkerEnv {
    type Obs = RgbFrame;

    fn reset(&mut self) -> Result<RgbFrame> {
        self.n_frames = 0;
        self.n_resets += 1;
        Ok(Self::frame(0))
    }

    fn step(&mut self, _act: usize) -> Result<(Step<RgbFrame>, Record)> {
        self.n_frames += 1;
        let n = self.n_frames;
        let is_done = self.done_at == Some(n);
        Ok((
            Step::new(Self::frame(n), Self::reward(n), is_done),
            Record::empty(),
        ))
    }

    fn action_meanings(&self) -> Vec<String> {
        self.action_meanings.clone()
    }
}
