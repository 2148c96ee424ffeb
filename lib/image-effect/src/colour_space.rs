use crate::{Effect, ImageEffectResult, pixel_chunks, to_channel};
use derivative::Derivative;
use derive_setters::Setters;
use image::DynamicImage;

/// Converts normalized RGB in `[0, 1]` to `(hue, saturation, value)`, all in
/// `[0, 1]`. Hue is a fraction of a full turn.
pub fn rgb_to_hsv(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let value = max;

    if max == min {
        return (0.0, 0.0, value);
    }

    let delta = max - min;
    let saturation = delta / max;
    let rc = (max - r) / delta;
    let gc = (max - g) / delta;
    let bc = (max - b) / delta;

    let hue = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };

    ((hue / 6.0).rem_euclid(1.0), saturation, value)
}

/// Inverse of [`rgb_to_hsv`]. A hue of exactly `1.0` is treated as `0.0`.
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    if s == 0.0 {
        return (v, v, v);
    }

    let scaled = h * 6.0;
    let sector = scaled.floor();
    let f = scaled - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match (sector as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Rotate every pixel's hue by a fraction of the colour wheel while keeping
/// saturation and value.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct HueShiftConfig {
    /// Fraction of a full turn, 0.15 is about 54 degrees. Negative values wrap.
    #[derivative(Default(value = "0.0"))]
    pub amount: f32,
}

impl HueShiftConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for HueShiftConfig {
    fn apply(&self, image: &mut DynamicImage) -> ImageEffectResult<()> {
        if self.amount == 0.0 {
            return Ok(());
        }

        if !self.amount.is_finite() {
            return Err(crate::ImageEffectError::InvalidParameter(format!(
                "hue shift must be finite, got {}",
                self.amount
            )));
        }

        for pixel in pixel_chunks(image) {
            let (h, s, v) = rgb_to_hsv(
                pixel[0] as f32 / 255.0,
                pixel[1] as f32 / 255.0,
                pixel[2] as f32 / 255.0,
            );
            let (r, g, b) = hsv_to_rgb((h + self.amount).rem_euclid(1.0), s, v);

            pixel[0] = to_channel(r * 255.0);
            pixel[1] = to_channel(g * 255.0);
            pixel[2] = to_channel(b * 255.0);
        }

        Ok(())
    }
}

pub fn shift_hue(image: &mut DynamicImage, amount: f32) -> ImageEffectResult<()> {
    HueShiftConfig::new().with_amount(amount).apply(image)
}
