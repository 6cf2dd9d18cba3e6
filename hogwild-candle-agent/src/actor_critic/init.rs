//! Weight initialisation of [`CnnActorCritic`](super::CnnActorCritic).
use anyhow::{bail, Result};
use candle_core::{Tensor, Var};
use serde::{Deserialize, Serialize};

/// How the weights are initialised. Biases always start at zero.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub enum WeightInit {
    /// Orthogonal matrices, scaled by `sqrt(2)` in the torso, `0.01` in the
    /// policy head and `1` in the value head.
    Ortho,

    /// Glorot (Xavier) uniform.
    Glorot,
}

impl Default for WeightInit {
    fn default() -> Self {
        Self::Ortho
    }
}

impl WeightInit {
    /// Overwrites `vars`, named as in a candle `VarMap`.
    pub(super) fn apply(&self, vars: &[(String, Var)]) -> Result<()> {
        for (name, var) in vars.iter() {
            let dims = var.dims();
            let values = if name.ends_with(".bias") {
                vec![0f32; var.elem_count()]
            } else {
                let rows = dims[0];
                let cols = var.elem_count() / rows.max(1);
                match self {
                    Self::Ortho => orthogonal(rows, cols, ortho_gain(name), var.as_tensor())?,
                    Self::Glorot => glorot(rows, cols, dims, var.as_tensor())?,
                }
            };
            var.set(&Tensor::from_vec(values, dims, var.device())?)?;
        }
        Ok(())
    }
}

fn ortho_gain(name: &str) -> f32 {
    if name.starts_with("policy.") {
        0.01
    } else if name.starts_with("value.") {
        1.0
    } else {
        2f32.sqrt()
    }
}

/// Flat `rows x cols` matrix whose rows (or columns, whichever are fewer) are
/// orthogonal with norm `gain`.
fn orthogonal(rows: usize, cols: usize, gain: f32, like: &Tensor) -> Result<Vec<f32>> {
    let (n, len) = (rows.min(cols), rows.max(cols));
    let normal = Tensor::randn(0f32, 1f32, (n, len), like.device())?.to_vec2::<f32>()?;

    // Modified Gram-Schmidt
    let mut q: Vec<Vec<f64>> = Vec::with_capacity(n);
    for v in normal.into_iter() {
        let mut v: Vec<f64> = v.into_iter().map(f64::from).collect();
        for u in q.iter() {
            let dot: f64 = v.iter().zip(u.iter()).map(|(a, b)| a * b).sum();
            v.iter_mut().zip(u.iter()).for_each(|(a, b)| *a -= dot * b);
        }
        let norm = v.iter().map(|a| a * a).sum::<f64>().sqrt();
        if norm < 1e-8 {
            bail!("Degenerate random matrix in orthogonal initialisation");
        }
        v.iter_mut().for_each(|a| *a /= norm);
        q.push(v);
    }

    let gain = gain as f64;
    let mut w = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let x = if rows <= cols { q[r][c] } else { q[c][r] };
            w.push((gain * x) as f32);
        }
    }
    Ok(w)
}

/// Uniform in `[-a, a]` with `a = sqrt(6 / (fan_in + fan_out))`.
fn glorot(rows: usize, cols: usize, dims: &[usize], like: &Tensor) -> Result<Vec<f32>> {
    // Convolution kernels count their receptive field in both fans
    let receptive: usize = dims.iter().skip(2).product();
    let fan_in = cols;
    let fan_out = rows * receptive;
    let a = (6.0 / (fan_in + fan_out) as f64).sqrt();
    Ok(Tensor::rand(-a as f32, a as f32, dims, like.device())?
        .flatten_all()?
        .to_vec1::<f32>()?)
}
