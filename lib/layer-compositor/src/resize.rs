use crate::{CompositorError, CompositorResult};
use fast_image_resize::{
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image as FastImage,
};
use image::RgbaImage;

/// Resample an RGBA image to `width` x `height` with a Lanczos3 convolution.
/// Colour is premultiplied by alpha while filtering so transparent pixels do
/// not bleed into their neighbours.
pub fn resize_rgba(image: RgbaImage, width: u32, height: u32) -> CompositorResult<RgbaImage> {
    let (src_width, src_height) = image.dimensions();
    if (src_width, src_height) == (width, height) {
        return Ok(image);
    }

    if width == 0 || height == 0 || src_width == 0 || src_height == 0 {
        return Err(CompositorError::InvalidSize { width, height });
    }

    let src_image = FastImage::from_vec_u8(src_width, src_height, image.into_raw(), PixelType::U8x4)?;
    let mut dst_image = FastImage::new(width, height, PixelType::U8x4);

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    Resizer::new().resize(&src_image, &mut dst_image, &options)?;

    RgbaImage::from_raw(width, height, dst_image.into_vec()).ok_or_else(|| {
        CompositorError::ImageProcessing("Failed to create resized image".to_string())
    })
}
