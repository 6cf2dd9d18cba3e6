use super::CnnConfig;
use crate::model::SubModel1;
use anyhow::{bail, Result};
use candle_core::Tensor;
use candle_nn::{
    conv::Conv2dConfig,
    conv2d, linear,
    sequential::{seq, Sequential},
    Module, VarBuilder,
};

/// (kernel, stride, output channels) of the convolution layers.
const CONVS: [(usize, usize, usize); 3] = [(8, 4, 32), (4, 2, 64), (3, 1, 64)];

#[allow(clippy::upper_case_acronyms)]
/// Convolutional network with the architecture of the DQN paper, without the
/// output layer.
///
/// Takes `(batch, n_stack, frame_size, frame_size)` inputs in `[0, 1]` and
/// returns `(batch, feature_dim)` features.
pub struct Cnn {
    seq: Sequential,
}

impl Cnn {
    fn stride(s: usize) -> Conv2dConfig {
        Conv2dConfig {
            stride: s,
            ..Default::default()
        }
    }

    /// Number of features after flattening the last convolution.
    pub fn flat_dim(frame_size: usize) -> Result<usize> {
        let mut size = frame_size;
        for (kernel, stride, _) in CONVS.iter() {
            if size < *kernel {
                bail!("Frame size {} is too small for the convolutions", frame_size);
            }
            size = (size - kernel) / stride + 1;
        }
        Ok(CONVS[2].2 * size * size)
    }
}

impl SubModel1 for Cnn {
    type Config = CnnConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, x: &Tensor) -> Result<Tensor> {
        Ok(self.seq.forward(x)?)
    }

    fn build(vb: VarBuilder, config: CnnConfig) -> Result<Self> {
        let flat_dim = Self::flat_dim(config.frame_size)?;
        let (k1, s1, c1) = CONVS[0];
        let (k2, s2, c2) = CONVS[1];
        let (k3, s3, c3) = CONVS[2];

        let seq = seq()
            .add(conv2d(config.n_stack, c1, k1, Self::stride(s1), vb.pp("c1"))?)
            .add_fn(|xs| xs.relu())
            .add(conv2d(c1, c2, k2, Self::stride(s2), vb.pp("c2"))?)
            .add_fn(|xs| xs.relu())
            .add(conv2d(c2, c3, k3, Self::stride(s3), vb.pp("c3"))?)
            .add_fn(|xs| xs.relu()?.flatten_from(1))
            .add(linear(flat_dim, config.feature_dim, vb.pp("l1"))?)
            .add_fn(|xs| xs.relu());

        Ok(Self { seq })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_flat_dim() -> Result<()> {
        assert_eq!(Cnn::flat_dim(84)?, 3136);
        assert_eq!(Cnn::flat_dim(36)?, 64);
        assert!(Cnn::flat_dim(20).is_err());
        Ok(())
    }
}
