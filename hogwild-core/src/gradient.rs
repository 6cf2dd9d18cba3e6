//! Gradients produced by a worker.
use crate::{error::HogwildError, params::ParamSpec};
use anyhow::Result;

/// Gradients of one loss evaluation, one flat vector per parameter tensor.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientSet(pub Vec<Vec<f32>>);

impl GradientSet {
    /// Number of tensors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` if there are no tensors.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-worker gradient accumulator.
///
/// Owned by exactly one worker; zeroed at the start of every update cycle.
#[derive(Clone, Debug)]
pub struct GradientBuffer {
    specs: Vec<ParamSpec>,
    values: Vec<Vec<f32>>,
}

impl GradientBuffer {
    /// Creates a zeroed buffer for parameters of the given shapes.
    pub fn new(specs: &[ParamSpec]) -> Self {
        Self {
            specs: specs.to_vec(),
            values: specs.iter().map(|s| vec![0.0; s.numel()]).collect(),
        }
    }

    /// Tensor names and shapes.
    pub fn specs(&self) -> &[ParamSpec] {
        &self.specs
    }

    /// Accumulated values.
    pub fn values(&self) -> &[Vec<f32>] {
        &self.values
    }

    /// Resets every element to zero.
    pub fn zero(&mut self) {
        self.values.iter_mut().for_each(|v| v.fill(0.0));
    }

    /// Adds a gradient set.
    pub fn accumulate(&mut self, grads: &GradientSet) -> Result<()> {
        if grads.len() != self.values.len() {
            return Err(HogwildError::ParamsMismatch(format!(
                "expected {} gradient tensors, got {}",
                self.values.len(),
                grads.len()
            ))
            .into());
        }
        for ((acc, g), spec) in self.values.iter_mut().zip(grads.0.iter()).zip(self.specs.iter()) {
            if acc.len() != g.len() {
                return Err(HogwildError::ParamsMismatch(format!(
                    "gradient of {} has {} elements, expected {}",
                    spec.name,
                    g.len(),
                    acc.len()
                ))
                .into());
            }
            acc.iter_mut().zip(g.iter()).for_each(|(a, g)| *a += g);
        }
        Ok(())
    }

    /// L2 norm over all elements.
    pub fn global_norm(&self) -> f32 {
        self.values
            .iter()
            .flat_map(|v| v.iter())
            .map(|g| g * g)
            .sum::<f32>()
            .sqrt()
    }

    /// Rescales the buffer so that its global norm is at most `max_norm`.
    ///
    /// Returns the norm before clipping.
    pub fn clip_by_global_norm(&mut self, max_norm: f32) -> f32 {
        let norm = self.global_norm();
        if norm > max_norm && norm > 0.0 {
            let scale = max_norm / norm;
            self.values
                .iter_mut()
                .flat_map(|v| v.iter_mut())
                .for_each(|g| *g *= scale);
        }
        norm
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn buffer() -> GradientBuffer {
        GradientBuffer::new(&[ParamSpec::new("w", &[2]), ParamSpec::new("b", &[1])])
    }

    #[test]
    fn test_accumulate_and_zero() -> Result<()> {
        let mut buf = buffer();
        buf.accumulate(&GradientSet(vec![vec![1.0, 2.0], vec![3.0]]))?;
        buf.accumulate(&GradientSet(vec![vec![1.0, 0.0], vec![-1.0]]))?;
        assert_eq!(buf.values(), &[vec![2.0, 2.0], vec![2.0]]);

        buf.zero();
        assert_eq!(buf.values(), &[vec![0.0, 0.0], vec![0.0]]);

        assert!(buf.accumulate(&GradientSet(vec![vec![1.0]])).is_err());
        assert!(buf
            .accumulate(&GradientSet(vec![vec![1.0], vec![1.0]]))
            .is_err());
        Ok(())
    }

    #[test]
    fn test_clip_by_global_norm() -> Result<()> {
        let mut buf = buffer();
        buf.accumulate(&GradientSet(vec![vec![3.0, 0.0], vec![4.0]]))?;

        let norm = buf.clip_by_global_norm(10.0);
        assert_eq!(norm, 5.0);
        assert_eq!(buf.values(), &[vec![3.0, 0.0], vec![4.0]]);

        let norm = buf.clip_by_global_norm(0.5);
        assert_eq!(norm, 5.0);
        assert!((buf.global_norm() - 0.5).abs() < 1e-6);
        assert!((buf.values()[0][0] - 0.3).abs() < 1e-6);
        Ok(())
    }
}
