use super::FrameTransform;
use crate::frame::{GrayFrame, RgbFrame};
use anyhow::{anyhow, Result};
use hogwild_core::error::HogwildError;
use image::{
    imageops::{grayscale, resize, FilterType::Triangle},
    ImageBuffer, Rgb,
};
use ndarray::Array2;

/// Converts an RGB frame to luminance and rescales it with bilinear
/// interpolation.
#[derive(Clone, Debug)]
pub struct LuminanceScale {
    width: u32,
    height: u32,
}

impl Default for LuminanceScale {
    fn default() -> Self {
        Self {
            width: 84,
            height: 84,
        }
    }
}

impl LuminanceScale {
    /// Output size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FrameTransform for LuminanceScale {
    type Input = RgbFrame;
    type Output = GrayFrame;

    fn transform(&self, frame: RgbFrame) -> Result<GrayFrame> {
        let (h, w, c) = frame.dim();
        if c != 3 {
            return Err(HogwildError::InvalidFrame(format!(
                "expected 3 colour channels, got {}",
                c
            ))
            .into());
        }

        // Logical order iteration copes with non-standard layouts.
        let raw: Vec<u8> = frame.iter().copied().collect();
        let img = ImageBuffer::<Rgb<u8>, _>::from_raw(w as u32, h as u32, raw)
            .ok_or_else(|| anyhow!("Failed to build an image of size {}x{}", w, h))?;
        let img = grayscale(&img);
        let img = resize(&img, self.width, self.height, Triangle);

        Ok(Array2::from_shape_vec(
            (self.height as usize, self.width as usize),
            img.into_raw(),
        )?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_shape_and_range() -> Result<()> {
        let stage = LuminanceScale::default();

        let black = Array3::<u8>::zeros((210, 160, 3));
        let out = stage.transform(black)?;
        assert_eq!(out.dim(), (84, 84));
        assert!(out.iter().all(|&x| x == 0));

        let white = Array3::<u8>::from_elem((210, 160, 3), 255);
        let out = stage.transform(white)?;
        assert!(out.iter().all(|&x| x == 255));
        Ok(())
    }

    #[test]
    fn test_deterministic() -> Result<()> {
        let stage = LuminanceScale::default();
        let frame = Array3::from_shape_fn((210, 160, 3), |(i, j, k)| ((i * 7 + j * 3 + k) % 256) as u8);
        assert_eq!(stage.transform(frame.clone())?, stage.transform(frame)?);
        Ok(())
    }

    #[test]
    fn test_rejects_gray_input() {
        let stage = LuminanceScale::default();
        assert!(stage.transform(Array3::zeros((210, 160, 1))).is_err());
    }
}
