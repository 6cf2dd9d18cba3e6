use super::FrameTransform;
use crate::frame::{RgbFrame, UnitFrame};
use anyhow::Result;
use hogwild_core::error::HogwildError;
use ndarray::{s, Array2, Axis};

/// Rows of the screen holding the Pong playing field.
const FIELD_ROWS: (usize, usize) = (34, 194);
const SCREEN_WIDTH: usize = 160;
const DOWNSAMPLE: usize = 2;
const PAD: usize = 2;
const THRESHOLD: f32 = 0.4;

/// Pong-specific features: paddles and ball as 1, everything else as 0.
///
/// Grayscales by channel mean, crops the playing field, keeps every second
/// row and column, pads to 84x84 and thresholds.
#[derive(Clone, Debug, Default)]
pub struct PongFeatures;

impl FrameTransform for PongFeatures {
    type Input = RgbFrame;
    type Output = UnitFrame;

    fn transform(&self, frame: RgbFrame) -> Result<UnitFrame> {
        let (h, w, _) = frame.dim();
        if h < FIELD_ROWS.1 || w != SCREEN_WIDTH {
            return Err(HogwildError::InvalidFrame(format!(
                "Pong features need at least {} rows and {} columns, got {}x{}",
                FIELD_ROWS.1, SCREEN_WIDTH, h, w
            ))
            .into());
        }

        let gray = frame
            .mapv(|x| x as f32 / 255.0)
            .mean_axis(Axis(2))
            .ok_or_else(|| HogwildError::InvalidFrame("frame has no channels".to_string()))?;
        let field = gray.slice(s![
            FIELD_ROWS.0..FIELD_ROWS.1;DOWNSAMPLE,
            ..;DOWNSAMPLE
        ]);

        let (fh, fw) = field.dim();
        let mut out = Array2::zeros((fh + 2 * PAD, fw + 2 * PAD));
        out.slice_mut(s![PAD..PAD + fh, PAD..PAD + fw])
            .assign(&field.mapv(|x| if x > THRESHOLD { 1.0 } else { 0.0 }));
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_pong_features() -> Result<()> {
        let mut frame = Array3::<u8>::from_elem((210, 160, 3), 60);
        // Bright pixel inside the field, on an even offset from its top row
        frame.slice_mut(s![34 + 10, 20, ..]).fill(200);
        // Bright pixel above the field
        frame.slice_mut(s![10, 20, ..]).fill(255);

        let out = PongFeatures.transform(frame)?;
        assert_eq!(out.dim(), (84, 84));
        assert_eq!(out[[PAD + 5, PAD + 10]], 1.0);
        assert_eq!(out.sum(), 1.0);
        Ok(())
    }

    #[test]
    fn test_rejects_small_frame() {
        assert!(PongFeatures.transform(Array3::zeros((100, 160, 3))).is_err());
    }
}
