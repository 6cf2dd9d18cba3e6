use super::FrameTransform;
use crate::frame::{GrayFrame, UnitFrame};
use anyhow::Result;

/// Maps 8-bit intensities to `[0, 1]`.
#[derive(Clone, Debug, Default)]
pub struct Normalize;

impl FrameTransform for Normalize {
    type Input = GrayFrame;
    type Output = UnitFrame;

    fn transform(&self, frame: GrayFrame) -> Result<UnitFrame> {
        Ok(frame.mapv(|x| x as f32 / 255.0))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_normalize() -> Result<()> {
        let out = Normalize.transform(arr2(&[[0u8, 51], [255, 102]]))?;
        assert_eq!(out, arr2(&[[0.0f32, 0.2], [1.0, 0.4]]));
        Ok(())
    }
}
