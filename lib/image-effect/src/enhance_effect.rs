//! Multiplicative enhancements in the style of Pillow's `ImageEnhance`.
//!
//! Each adjustment interpolates (or extrapolates) between the image and a
//! degenerate version of it: `out = degenerate + factor * (image - degenerate)`.
//! A factor of 1.0 returns the image unchanged. Alpha is never touched.

use crate::{Effect, ImageEffectError, ImageEffectResult, base_effect::luma, pixel_chunks, to_channel};
use derivative::Derivative;
use derive_setters::Setters;
use image::DynamicImage;

fn check_factor(name: &str, factor: f32) -> ImageEffectResult<()> {
    if factor.is_finite() && factor >= 0.0 {
        Ok(())
    } else {
        Err(ImageEffectError::InvalidParameter(format!(
            "{name} factor must be a non-negative number, got {factor}"
        )))
    }
}

#[inline]
fn blend(degenerate: f32, value: u8, factor: f32) -> u8 {
    to_channel(degenerate + factor * (value as f32 - degenerate))
}

/// Saturation enhancement. 0.0 gives a grayscale image.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct SaturationConfig {
    #[derivative(Default(value = "1.0"))]
    pub factor: f32,
}

impl SaturationConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for SaturationConfig {
    fn apply(&self, image: &mut DynamicImage) -> ImageEffectResult<()> {
        check_factor("saturation", self.factor)?;
        if self.factor == 1.0 {
            return Ok(());
        }

        for pixel in pixel_chunks(image) {
            let gray = luma(pixel) as f32;
            for i in 0..3 {
                pixel[i] = blend(gray, pixel[i], self.factor);
            }
        }

        Ok(())
    }
}

/// Brightness enhancement. 0.0 gives a black image.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BrightnessConfig {
    #[derivative(Default(value = "1.0"))]
    pub factor: f32,
}

impl BrightnessConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for BrightnessConfig {
    fn apply(&self, image: &mut DynamicImage) -> ImageEffectResult<()> {
        check_factor("brightness", self.factor)?;
        if self.factor == 1.0 {
            return Ok(());
        }

        for pixel in pixel_chunks(image) {
            for i in 0..3 {
                pixel[i] = blend(0.0, pixel[i], self.factor);
            }
        }

        Ok(())
    }
}

/// Contrast enhancement around the mean luma. 0.0 gives a flat gray image.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct ContrastConfig {
    #[derivative(Default(value = "1.0"))]
    pub factor: f32,
}

impl ContrastConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean luma of every pixel, transparent ones included, rounded.
    fn mean_luma(image: &mut DynamicImage) -> f32 {
        let (sum, count) = pixel_chunks(image)
            .fold((0u64, 0u64), |(sum, count), pixel| {
                (sum + luma(pixel) as u64, count + 1)
            });

        if count == 0 {
            0.0
        } else {
            (sum as f64 / count as f64).round() as f32
        }
    }
}

impl Effect for ContrastConfig {
    fn apply(&self, image: &mut DynamicImage) -> ImageEffectResult<()> {
        check_factor("contrast", self.factor)?;
        if self.factor == 1.0 {
            return Ok(());
        }

        let mean = Self::mean_luma(image);
        log::debug!("contrast {}x around mean luma {mean}", self.factor);

        for pixel in pixel_chunks(image) {
            for i in 0..3 {
                pixel[i] = blend(mean, pixel[i], self.factor);
            }
        }

        Ok(())
    }
}
