use derivative::Derivative;
use image::{DynamicImage, Rgb};
use image_effect::{
    BrightnessConfig, ColorOverlayConfig, ContrastConfig, Effect, HueShiftConfig, ImageEffect,
    SaturationConfig, TemperatureConfig,
};
use serde::{Deserialize, Serialize};

/// Solid colour blended over the colour channels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub color: [u8; 3],
    pub opacity: f32,
}

/// Parameters applied to one image or one semantic layer.
///
/// Every field defaults to "unchanged", so a config only names what it
/// actually adjusts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct Recipe {
    /// Fraction of a full colour-wheel turn.
    pub hue_shift: f32,

    /// `[-1, 1]`, positive is warmer.
    pub temperature: f32,

    #[derivative(Default(value = "1.0"))]
    pub saturation: f32,

    #[derivative(Default(value = "1.0"))]
    pub brightness: f32,

    #[derivative(Default(value = "1.0"))]
    pub contrast: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<Overlay>,

    pub flip: bool,
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recipe for layers that keep their colours and only follow the
    /// scene's mirroring.
    pub fn flip_only(&self) -> Self {
        Self {
            flip: self.flip,
            ..Self::default()
        }
    }

    pub fn is_identity(&self) -> bool {
        self.effects().is_empty()
    }

    /// Effects in application order: hue, temperature, saturation,
    /// brightness, contrast, overlay, flip. Parameters at their neutral
    /// value produce no effect at all.
    pub fn effects(&self) -> Vec<ImageEffect> {
        let mut effects = Vec::new();

        if self.hue_shift != 0.0 {
            effects.push(ImageEffect::HueShift(
                HueShiftConfig::new().with_amount(self.hue_shift),
            ));
        }
        if self.temperature != 0.0 {
            effects.push(ImageEffect::Temperature(
                TemperatureConfig::new().with_amount(self.temperature),
            ));
        }
        if self.saturation != 1.0 {
            effects.push(ImageEffect::Saturation(
                SaturationConfig::new().with_factor(self.saturation),
            ));
        }
        if self.brightness != 1.0 {
            effects.push(ImageEffect::Brightness(
                BrightnessConfig::new().with_factor(self.brightness),
            ));
        }
        if self.contrast != 1.0 {
            effects.push(ImageEffect::Contrast(
                ContrastConfig::new().with_factor(self.contrast),
            ));
        }
        if let Some(overlay) = self.overlay.filter(|o| o.opacity != 0.0) {
            effects.push(ImageEffect::ColorOverlay(
                ColorOverlayConfig::new()
                    .with_color(Rgb(overlay.color))
                    .with_opacity(overlay.opacity),
            ));
        }
        if self.flip {
            effects.push(ImageEffect::HorizontalFlip);
        }

        effects
    }

    pub fn apply(&self, image: &mut DynamicImage) -> image_effect::ImageEffectResult<()> {
        for effect in self.effects() {
            log::info!("    - {}", effect.describe());
            effect.apply(image)?;
        }
        Ok(())
    }
}
