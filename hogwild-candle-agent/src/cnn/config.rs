use serde::{Deserialize, Serialize};

/// Configuration of [`Cnn`](super::Cnn).
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CnnConfig {
    /// Number of stacked frames, i.e. input channels.
    pub n_stack: usize,

    /// Height and width of a frame.
    pub frame_size: usize,

    /// Size of the output feature vector.
    pub feature_dim: usize,
}

impl Default for CnnConfig {
    fn default() -> Self {
        Self {
            n_stack: 4,
            frame_size: 84,
            feature_dim: 512,
        }
    }
}

impl CnnConfig {
    /// Sets the number of stacked frames.
    pub fn n_stack(mut self, v: usize) -> Self {
        self.n_stack = v;
        self
    }

    /// Sets the frame size.
    pub fn frame_size(mut self, v: usize) -> Self {
        self.frame_size = v;
        self
    }

    /// Sets the size of the output feature vector.
    pub fn feature_dim(mut self, v: usize) -> Self {
        self.feature_dim = v;
        self
    }
}
