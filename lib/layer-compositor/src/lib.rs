pub mod resize;

use image::{Rgb, RgbImage, RgbaImage};
use std::path::{Path, PathBuf};

pub use resize::resize_rgba;

pub type CompositorResult<T> = std::result::Result<T, CompositorError>;

#[derive(thiserror::Error, Debug)]
pub enum CompositorError {
    #[error("Layer stack is empty")]
    EmptyStack,

    #[error("Layer {index} is {actual:?}, expected {expected:?}")]
    SizeMismatch {
        index: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Invalid target size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },

    #[error("Failed to load layer {path}: {source}")]
    LoadLayer {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Image resize error: {0}")]
    ImageResize(#[from] fast_image_resize::ResizeError),

    #[error("Image buffer error: {0}")]
    ImageBufferError(#[from] fast_image_resize::ImageBufferError),
}

/// Load every file of a back-to-front layer stack and composite them into
/// one RGBA image.
///
/// With a `target_size` each layer is resampled to it before compositing,
/// otherwise every layer must share the first layer's size.
pub fn combine_layers<P: AsRef<Path>>(
    paths: &[P],
    target_size: Option<(u32, u32)>,
) -> CompositorResult<RgbaImage> {
    let mut layers = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        log::debug!("loading layer {}", path.display());

        let layer = image::open(path).map_err(|source| CompositorError::LoadLayer {
            path: path.to_path_buf(),
            source,
        })?;
        layers.push(layer.to_rgba8());
    }

    combine_images(layers, target_size)
}

/// In-memory form of [`combine_layers`].
pub fn combine_images(
    layers: impl IntoIterator<Item = RgbaImage>,
    target_size: Option<(u32, u32)>,
) -> CompositorResult<RgbaImage> {
    let mut layers = layers.into_iter();
    let first = layers.next().ok_or(CompositorError::EmptyStack)?;

    let mut base = match target_size {
        Some((width, height)) => resize_rgba(first, width, height)?,
        None => first,
    };

    for (index, layer) in layers.enumerate() {
        let layer = match target_size {
            Some((width, height)) => resize_rgba(layer, width, height)?,
            None => layer,
        };

        if layer.dimensions() != base.dimensions() {
            return Err(CompositorError::SizeMismatch {
                index: index + 1,
                expected: base.dimensions(),
                actual: layer.dimensions(),
            });
        }

        alpha_composite(&mut base, &layer);
    }

    Ok(base)
}

/// Porter-Duff "over": draws `src` on top of `dst` in place. Both images
/// must have the same dimensions.
pub fn alpha_composite(dst: &mut RgbaImage, src: &RgbaImage) {
    debug_assert_eq!(dst.dimensions(), src.dimensions());

    for (d, s) in dst.pixels_mut().zip(src.pixels()) {
        match s[3] {
            0 => continue,
            255 => {
                *d = *s;
                continue;
            }
            _ => {}
        }

        let src_alpha = s[3] as f32 / 255.0;
        let dst_alpha = d[3] as f32 / 255.0;
        let dst_weight = dst_alpha * (1.0 - src_alpha);
        let out_alpha = src_alpha + dst_weight;

        for i in 0..3 {
            let colour = (s[i] as f32 * src_alpha + d[i] as f32 * dst_weight) / out_alpha;
            d[i] = colour.round().clamp(0.0, 255.0) as u8;
        }
        d[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

/// Composite an RGBA image onto a solid background using its alpha as the
/// mask, producing an opaque RGB image.
pub fn flatten(image: &RgbaImage, background: Rgb<u8>) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y);
        let alpha = pixel[3] as u32;
        let mut out = [0u8; 3];
        for i in 0..3 {
            let mixed = pixel[i] as u32 * alpha + background[i] as u32 * (255 - alpha);
            out[i] = ((mixed + 127) / 255) as u8;
        }
        Rgb(out)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 40) as u8, (y * 40) as u8, ((x + y) * 20) as u8, 255 - (x * 10) as u8])
        })
    }

    #[test]
    fn test_single_layer_is_unchanged() {
        let a = checker(5, 4);
        assert_eq!(combine_images([a.clone()], None).unwrap(), a);
    }

    #[test]
    fn test_transparent_top_keeps_bottom() {
        let a = checker(5, 4);
        let b = RgbaImage::from_pixel(5, 4, Rgba([9, 200, 31, 0]));
        assert_eq!(combine_images([a.clone(), b], None).unwrap(), a);
    }

    #[test]
    fn test_opaque_top_replaces_bottom() {
        let a = checker(5, 4);
        let b = RgbaImage::from_pixel(5, 4, Rgba([9, 200, 31, 255]));
        assert_eq!(combine_images([a, b.clone()], None).unwrap(), b);
    }

    #[test]
    fn test_opaque_top_with_resize() {
        let a = checker(5, 4);
        let b = RgbaImage::from_pixel(3, 3, Rgba([9, 200, 31, 255]));
        let combined = combine_images([a, b], Some((6, 6))).unwrap();

        assert_eq!(combined.dimensions(), (6, 6));
        for pixel in combined.pixels() {
            for (got, want) in pixel.0.iter().zip([9u8, 200, 31, 255]) {
                assert!(got.abs_diff(want) <= 1, "{got} vs {want}");
            }
        }
    }

    #[test]
    fn test_half_transparent_over_opaque() {
        let a = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 200, 255]));
        let b = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128]));
        let combined = combine_images([a, b], None).unwrap();
        assert_eq!(combined.get_pixel(0, 0).0, [128, 0, 100, 255]);
    }

    #[test]
    fn test_over_onto_transparent_keeps_source_colour() {
        let a = RgbaImage::new(1, 1);
        let b = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 100]));
        let combined = combine_images([a, b], None).unwrap();
        assert_eq!(combined.get_pixel(0, 0).0, [10, 20, 30, 100]);
    }

    #[test]
    fn test_order_matters() {
        let red = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255]));
        let blue = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255]));

        let red_on_top = combine_images([blue.clone(), red.clone()], None).unwrap();
        let blue_on_top = combine_images([red, blue], None).unwrap();
        assert_ne!(red_on_top, blue_on_top);
        assert_eq!(red_on_top.get_pixel(1, 1).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_empty_and_mismatched_stacks() {
        assert!(matches!(
            combine_images(Vec::new(), None),
            Err(CompositorError::EmptyStack)
        ));
        assert!(matches!(
            combine_images([RgbaImage::new(2, 2), RgbaImage::new(3, 2)], None),
            Err(CompositorError::SizeMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn test_flatten() {
        let mut image = RgbaImage::new(3, 1);
        image.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        image.put_pixel(1, 0, Rgba([10, 20, 30, 0]));
        image.put_pixel(2, 0, Rgba([0, 0, 0, 128]));

        let flat = flatten(&image, Rgb([200, 230, 240]));
        assert_eq!(flat.get_pixel(0, 0).0, [10, 20, 30]);
        assert_eq!(flat.get_pixel(1, 0).0, [200, 230, 240]);
        assert_eq!(flat.get_pixel(2, 0).0, [100, 115, 120]);
    }

    #[test]
    fn test_rgb_layer_becomes_opaque_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let sky = dir.path().join("sky.png");

        RgbImage::from_fn(3, 2, |x, y| Rgb([x as u8 * 80, y as u8 * 120, 33]))
            .save(&sky)
            .unwrap();

        let combined = combine_layers(&[&sky], None).unwrap();
        assert_eq!(combined.dimensions(), (3, 2));
        assert_eq!(combined.get_pixel(2, 1).0, [160, 120, 33, 255]);
        assert!(combined.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_combine_layers_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let bottom = dir.path().join("sky.png");
        let top = dir.path().join("mist.png");

        RgbaImage::from_pixel(4, 2, Rgba([0, 0, 255, 255]))
            .save(&bottom)
            .unwrap();
        RgbaImage::from_fn(4, 2, |x, _| {
            if x < 2 { Rgba([255, 255, 255, 255]) } else { Rgba([0, 0, 0, 0]) }
        })
        .save(&top)
        .unwrap();

        let combined = combine_layers(&[&bottom, &top], None).unwrap();
        assert_eq!(combined.get_pixel(0, 1).0, [255, 255, 255, 255]);
        assert_eq!(combined.get_pixel(3, 1).0, [0, 0, 255, 255]);

        let missing = dir.path().join("nope.png");
        assert!(matches!(
            combine_layers(&[missing], None),
            Err(CompositorError::LoadLayer { .. })
        ));
    }
}
