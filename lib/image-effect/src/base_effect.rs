use crate::{Effect, ImageEffectResult};
use image::DynamicImage;

/// Mirror an image left to right. Column `x` moves to `width - 1 - x` and
/// every channel, alpha included, moves with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalFlip;

impl Effect for HorizontalFlip {
    fn apply(&self, image: &mut DynamicImage) -> ImageEffectResult<()> {
        *image = image.fliph();
        Ok(())
    }
}

/// ITU-R 601-2 luma of an 8-bit RGB triple, rounded to the nearest integer.
#[inline]
pub(crate) fn luma(pixel: &[u8]) -> u8 {
    let weighted = pixel[0] as u32 * 299 + pixel[1] as u32 * 587 + pixel[2] as u32 * 114;
    ((weighted + 500) / 1000) as u8
}
