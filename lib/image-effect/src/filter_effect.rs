use crate::{Effect, ImageEffectError, ImageEffectResult, pixel_chunks, to_channel};
use derivative::Derivative;
use derive_setters::Setters;
use image::{DynamicImage, Rgb};

const WARM_GAIN: f32 = 0.3;
const COOL_LOSS: f32 = 0.2;

/// Color temperature configuration
///
/// Positive amounts warm the image (more red, less blue), negative amounts
/// cool it. Green is never touched.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct TemperatureConfig {
    /// In `[-1, 1]`.
    #[derivative(Default(value = "0.0"))]
    pub amount: f32,
}

impl TemperatureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    fn scale(image: &mut DynamicImage, red: f32, blue: f32) {
        for pixel in pixel_chunks(image) {
            pixel[0] = to_channel(pixel[0] as f32 * red);
            pixel[2] = to_channel(pixel[2] as f32 * blue);
        }
    }
}

impl Effect for TemperatureConfig {
    fn apply(&self, image: &mut DynamicImage) -> ImageEffectResult<()> {
        if !(-1.0..=1.0).contains(&self.amount) {
            return Err(ImageEffectError::InvalidParameter(format!(
                "temperature must be within [-1, 1], got {}",
                self.amount
            )));
        }

        let t = self.amount;
        if t > 0.0 {
            Self::scale(image, 1.0 + t * WARM_GAIN, 1.0 - t * COOL_LOSS);
        } else if t < 0.0 {
            let m = t.abs();
            Self::scale(image, 1.0 - m * COOL_LOSS, 1.0 + m * WARM_GAIN);
        }

        Ok(())
    }
}

pub fn adjust_temperature(image: &mut DynamicImage, amount: f32) -> ImageEffectResult<()> {
    TemperatureConfig::new().with_amount(amount).apply(image)
}

/// Solid colour laid over the colour channels at a fixed opacity.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ColorOverlayConfig {
    #[derivative(Default(value = "Rgb([255, 255, 255])"))]
    pub color: Rgb<u8>,

    /// In `[0, 1]`.
    #[derivative(Default(value = "0.0"))]
    pub opacity: f32,
}

impl ColorOverlayConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for ColorOverlayConfig {
    fn apply(&self, image: &mut DynamicImage) -> ImageEffectResult<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(ImageEffectError::InvalidParameter(format!(
                "overlay opacity must be within [0, 1], got {}",
                self.opacity
            )));
        }

        if self.opacity == 0.0 {
            return Ok(());
        }

        let keep = 1.0 - self.opacity;
        for pixel in pixel_chunks(image) {
            for i in 0..3 {
                pixel[i] = to_channel(self.color[i] as f32 * self.opacity + pixel[i] as f32 * keep);
            }
        }

        Ok(())
    }
}
