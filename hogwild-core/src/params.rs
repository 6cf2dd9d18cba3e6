//! Parameters shared by all workers.
//!
//! [`SharedParams`] stores every element as an [`AtomicF32`]. Reads and
//! writes of a single element are atomic; nothing else is. Two workers may
//! apply their updates to the same tensor at the same time and a worker may
//! copy a tensor that another one is halfway through updating. That is the
//! Hogwild trade-off: consistency across elements is given up for lock-free
//! throughput.
use crate::error::HogwildError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// An `f32` stored as its bit pattern in an [`AtomicU32`].
#[derive(Debug, Default)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    /// Creates a new value.
    pub fn new(v: f32) -> Self {
        Self(AtomicU32::new(v.to_bits()))
    }

    /// Loads the value.
    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    /// Stores a value.
    #[inline]
    pub fn store(&self, v: f32) {
        self.0.store(v.to_bits(), Ordering::Relaxed)
    }

    /// Adds `delta` and returns the previous value.
    ///
    /// Concurrent additions are never lost.
    #[inline]
    pub fn fetch_add(&self, delta: f32) -> f32 {
        let mut cur = self.0.load(Ordering::Relaxed);
        loop {
            let new = (f32::from_bits(cur) + delta).to_bits();
            match self
                .0
                .compare_exchange_weak(cur, new, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(prev) => return f32::from_bits(prev),
                Err(actual) => cur = actual,
            }
        }
    }
}

/// Name and shape of a parameter tensor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Name, e.g. `conv1.weight`.
    pub name: String,

    /// Shape.
    pub shape: Vec<usize>,
}

impl ParamSpec {
    /// Constructs a spec.
    pub fn new(name: impl Into<String>, shape: &[usize]) -> Self {
        Self {
            name: name.into(),
            shape: shape.to_vec(),
        }
    }

    /// Number of elements.
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }
}

/// A plain copy of the parameters, e.g. for a checkpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamsSnapshot {
    /// Tensor names and shapes.
    pub specs: Vec<ParamSpec>,

    /// Flat values of each tensor.
    pub values: Vec<Vec<f32>>,
}

struct SharedTensor {
    spec: ParamSpec,
    data: Vec<AtomicF32>,
}

/// The global parameter set.
pub struct SharedParams {
    tensors: Vec<SharedTensor>,
}

fn check_values(specs: &[ParamSpec], values: &[Vec<f32>]) -> Result<(), HogwildError> {
    if specs.len() != values.len() {
        return Err(HogwildError::ParamsMismatch(format!(
            "expected {} tensors, got {}",
            specs.len(),
            values.len()
        )));
    }
    for (spec, v) in specs.iter().zip(values.iter()) {
        if spec.numel() != v.len() {
            return Err(HogwildError::ParamsMismatch(format!(
                "{} has {} elements, got {}",
                spec.name,
                spec.numel(),
                v.len()
            )));
        }
    }
    Ok(())
}

impl SharedParams {
    /// Creates zero-filled parameters.
    pub fn new(specs: &[ParamSpec]) -> Self {
        let tensors = specs
            .iter()
            .map(|spec| SharedTensor {
                spec: spec.clone(),
                data: (0..spec.numel()).map(|_| AtomicF32::new(0.0)).collect(),
            })
            .collect();
        Self { tensors }
    }

    /// Creates parameters holding the given values.
    pub fn from_values(specs: &[ParamSpec], values: &[Vec<f32>]) -> Result<Self> {
        check_values(specs, values)?;
        let params = Self::new(specs);
        params.store_values(values);
        Ok(params)
    }

    /// Creates parameters from a snapshot.
    pub fn from_snapshot(snapshot: &ParamsSnapshot) -> Result<Self> {
        Self::from_values(&snapshot.specs, &snapshot.values)
    }

    fn store_values(&self, values: &[Vec<f32>]) {
        for (t, v) in self.tensors.iter().zip(values.iter()) {
            for (dst, x) in t.data.iter().zip(v.iter()) {
                dst.store(*x);
            }
        }
    }

    /// Tensor names and shapes.
    pub fn specs(&self) -> Vec<ParamSpec> {
        self.tensors.iter().map(|t| t.spec.clone()).collect()
    }

    /// Fails unless `specs` describes exactly these parameters.
    pub fn check_specs(&self, specs: &[ParamSpec]) -> Result<(), HogwildError> {
        if self.tensors.len() != specs.len()
            || self.tensors.iter().zip(specs.iter()).any(|(t, s)| &t.spec != s)
        {
            return Err(HogwildError::ParamsMismatch(format!(
                "expected {:?}, got {:?}",
                self.specs(),
                specs
            )));
        }
        Ok(())
    }

    /// Number of tensors.
    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    /// `true` if there are no tensors.
    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.tensors.iter().map(|t| t.data.len()).sum()
    }

    /// Element `index` of tensor `tensor`.
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn get(&self, tensor: usize, index: usize) -> f32 {
        self.tensors[tensor].data[index].load()
    }

    /// Adds `delta` to element `index` of tensor `tensor`.
    ///
    /// Panics if either index is out of range.
    #[inline]
    pub fn add(&self, tensor: usize, index: usize, delta: f32) {
        self.tensors[tensor].data[index].fetch_add(delta);
    }

    /// Overwrites element `index` of tensor `tensor`.
    #[inline]
    pub fn set(&self, tensor: usize, index: usize, value: f32) {
        self.tensors[tensor].data[index].store(value);
    }

    /// Copies the current values into `dst`, element by element.
    ///
    /// `dst` must have one vector per tensor of matching length.
    pub fn copy_to(&self, dst: &mut [Vec<f32>]) -> Result<()> {
        check_values(&self.specs(), dst)?;
        for (t, v) in self.tensors.iter().zip(dst.iter_mut()) {
            for (x, src) in v.iter_mut().zip(t.data.iter()) {
                *x = src.load();
            }
        }
        Ok(())
    }

    /// Allocates a local copy of the current values.
    pub fn to_values(&self) -> Vec<Vec<f32>> {
        self.tensors
            .iter()
            .map(|t| t.data.iter().map(AtomicF32::load).collect())
            .collect()
    }

    /// A copy of the current values together with their specs.
    pub fn snapshot(&self) -> ParamsSnapshot {
        ParamsSnapshot {
            specs: self.specs(),
            values: self.to_values(),
        }
    }

    /// Overwrites every element with the values of `snapshot`.
    pub fn restore(&self, snapshot: &ParamsSnapshot) -> Result<()> {
        self.check_specs(&snapshot.specs)?;
        check_values(&snapshot.specs, &snapshot.values)?;
        self.store_values(&snapshot.values);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{sync::Arc, thread};

    fn specs() -> Vec<ParamSpec> {
        vec![ParamSpec::new("w", &[2, 3]), ParamSpec::new("b", &[3])]
    }

    #[test]
    fn test_concurrent_add() {
        let params = Arc::new(SharedParams::new(&specs()));
        let n_threads = 8;
        let n_adds = 1000;

        let handles: Vec<_> = (0..n_threads)
            .map(|_| {
                let params = params.clone();
                thread::spawn(move || {
                    for _ in 0..n_adds {
                        params.add(0, 4, 0.5);
                    }
                })
            })
            .collect();
        handles.into_iter().for_each(|h| h.join().unwrap());

        assert_eq!(params.get(0, 4), 0.5 * (n_threads * n_adds) as f32);
        assert_eq!(params.get(0, 3), 0.0);
    }

    #[test]
    fn test_snapshot_restore() -> Result<()> {
        let values = vec![vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], vec![-1.0, 0.0, 1.0]];
        let params = SharedParams::from_values(&specs(), &values)?;
        let snapshot = params.snapshot();
        assert_eq!(snapshot.values, values);

        params.add(1, 0, 10.0);
        assert_eq!(params.get(1, 0), 9.0);

        params.restore(&snapshot)?;
        let mut local = vec![vec![0.0; 6], vec![0.0; 3]];
        params.copy_to(&mut local)?;
        assert_eq!(local, values);
        Ok(())
    }

    #[test]
    fn test_mismatch() {
        let params = SharedParams::new(&specs());
        let mut local = vec![vec![0.0; 6]];
        assert!(params.copy_to(&mut local).is_err());

        let other = ParamsSnapshot {
            specs: vec![ParamSpec::new("w", &[6]), ParamSpec::new("b", &[3])],
            values: vec![vec![0.0; 6], vec![0.0; 3]],
        };
        assert!(params.restore(&other).is_err());
    }
}
