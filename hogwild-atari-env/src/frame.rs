//! Frames and fixed-capacity frame windows.
use ndarray::{Array2, Array3};
use std::collections::VecDeque;

/// Raw emulator screen, `(height, width, 3)` RGB.
pub type RgbFrame = Array3<u8>;

/// Single-channel frame, `(height, width)`.
pub type GrayFrame = Array2<u8>;

/// Single-channel frame with values in `[0, 1]`.
pub type UnitFrame = Array2<f32>;

/// Stack of processed frames, `(depth, height, width)`, oldest first.
pub type FrameStackObs = Array3<f32>;

/// A sliding window over the most recent frames.
///
/// Pushing into a full ring evicts the oldest frame. The ring never grows
/// past its capacity.
#[derive(Clone, Debug)]
pub struct FrameRing<T> {
    capacity: usize,
    frames: VecDeque<T>,
}

impl<T> FrameRing<T> {
    /// Creates an empty ring.
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "FrameRing capacity must be positive");
        Self {
            capacity,
            frames: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a frame, evicting the oldest one if the ring is full.
    pub fn push(&mut self, frame: T) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Removes every frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// `true` once the ring holds `capacity` frames.
    pub fn is_full(&self) -> bool {
        self.frames.len() == self.capacity
    }

    /// Number of frames held.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` if the ring holds no frame.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over the frames, oldest first.
    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.frames.iter()
    }

    /// Most recent frame.
    pub fn newest(&self) -> Option<&T> {
        self.frames.back()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_push_evicts_oldest() {
        let mut ring = FrameRing::new(2);
        assert!(ring.is_empty());

        ring.push(0);
        assert!(!ring.is_full());
        ring.push(1);
        assert!(ring.is_full());
        ring.push(2);

        assert_eq!(ring.len(), 2);
        assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(ring.newest(), Some(&2));

        ring.clear();
        assert!(ring.is_empty());
    }
}
