pub mod base_effect;
pub mod colour_space;
pub mod enhance_effect;
pub mod filter_effect;

use image::DynamicImage;
use std::slice::ChunksExactMut;

pub use base_effect::HorizontalFlip;
pub use colour_space::{HueShiftConfig, shift_hue};
pub use enhance_effect::{BrightnessConfig, ContrastConfig, SaturationConfig};
pub use filter_effect::{ColorOverlayConfig, TemperatureConfig, adjust_temperature};

pub type ImageEffectResult<T> = Result<T, ImageEffectError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageEffectError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// An in-place transformation of an 8-bit RGB or RGBA image.
///
/// Implementations only touch the colour channels; the alpha channel of an
/// RGBA image is never modified.
pub trait Effect {
    fn apply(&self, image: &mut DynamicImage) -> ImageEffectResult<()>;
}

#[derive(Debug, Clone)]
pub enum ImageEffect {
    // Pixel transforms
    HueShift(colour_space::HueShiftConfig),
    Temperature(filter_effect::TemperatureConfig),
    ColorOverlay(filter_effect::ColorOverlayConfig),
    HorizontalFlip,

    // Enhancement pass
    Saturation(enhance_effect::SaturationConfig),
    Brightness(enhance_effect::BrightnessConfig),
    Contrast(enhance_effect::ContrastConfig),
}

impl Effect for ImageEffect {
    fn apply(&self, image: &mut DynamicImage) -> ImageEffectResult<()> {
        match self {
            ImageEffect::HueShift(config) => config.apply(image),
            ImageEffect::Temperature(config) => config.apply(image),
            ImageEffect::ColorOverlay(config) => config.apply(image),
            ImageEffect::HorizontalFlip => HorizontalFlip.apply(image),

            ImageEffect::Saturation(config) => config.apply(image),
            ImageEffect::Brightness(config) => config.apply(image),
            ImageEffect::Contrast(config) => config.apply(image),
        }
    }
}

impl ImageEffect {
    /// Short label used in progress output.
    pub fn describe(&self) -> String {
        match self {
            ImageEffect::HueShift(config) => format!(
                "hue shift {} ({:.0} deg)",
                config.amount,
                config.amount * 360.0
            ),
            ImageEffect::Temperature(config) => format!("temperature {}", config.amount),
            ImageEffect::ColorOverlay(config) => format!(
                "color overlay rgb({}, {}, {}) at {}",
                config.color[0], config.color[1], config.color[2], config.opacity
            ),
            ImageEffect::HorizontalFlip => "flip horizontal".to_string(),
            ImageEffect::Saturation(config) => format!("saturation {}x", config.factor),
            ImageEffect::Brightness(config) => format!("brightness {}x", config.factor),
            ImageEffect::Contrast(config) => format!("contrast {}x", config.factor),
        }
    }
}

/// Converts any decoded image into the 8-bit RGB or RGBA layout the effects
/// work on. Images with an alpha channel become RGBA8, all others RGB8.
pub fn normalize(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => image,
        other if other.color().has_alpha() => DynamicImage::ImageRgba8(other.to_rgba8()),
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    }
}

/// Per-pixel mutable views of the raw samples. Only the first three bytes of
/// each chunk are colour; a fourth byte, when present, is alpha.
pub(crate) fn pixel_chunks(image: &mut DynamicImage) -> ChunksExactMut<'_, u8> {
    match image {
        DynamicImage::ImageRgb8(buffer) => buffer.chunks_exact_mut(3),
        DynamicImage::ImageRgba8(buffer) => buffer.chunks_exact_mut(4),
        other => {
            let owned = std::mem::replace(other, DynamicImage::new_rgb8(0, 0));
            *other = normalize(owned);
            pixel_chunks(other)
        }
    }
}

/// Rounds half away from zero and clamps into the 8-bit range.
#[inline]
pub(crate) fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
pub(crate) mod test_util {
    use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

    /// A small RGBA image with a gradient in every channel, including alpha.
    pub fn gradient_rgba(width: u32, height: u32) -> DynamicImage {
        let image = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([
                (x * 37 % 256) as u8,
                (y * 53 % 256) as u8,
                ((x + y) * 29 % 256) as u8,
                ((x * 7 + y * 11) % 256) as u8,
            ])
        });
        DynamicImage::ImageRgba8(image)
    }

    pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 41 % 256) as u8,
                (y * 67 % 256) as u8,
                ((x * 3 + y * 5) % 256) as u8,
            ])
        });
        DynamicImage::ImageRgb8(image)
    }

    pub fn alpha_plane(image: &DynamicImage) -> Vec<u8> {
        image.to_rgba8().pixels().map(|p| p[3]).collect()
    }
}
