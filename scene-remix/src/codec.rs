use anyhow::{Context, Result};
use image::{
    DynamicImage, ExtendedColorType, ImageEncoder, ImageReader,
    codecs::{
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType, PngEncoder},
    },
};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

pub const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Opaque, lossy, fixed quality.
    Jpeg,
    /// Lossless, keeps alpha, best compression.
    Png,
}

impl OutputFormat {
    /// `.jpg` and `.jpeg` (any case) are JPEG, everything else is PNG.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let is_jpeg = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"));

        if is_jpeg { Self::Jpeg } else { Self::Png }
    }
}

/// Decode an image and normalize it to 8-bit RGB or RGBA.
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = path.as_ref();
    let image = ImageReader::open(path)
        .with_context(|| format!("open {} failed", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("read {} failed", path.display()))?
        .decode()
        .with_context(|| format!("decode {} failed", path.display()))?;

    Ok(image_effect::normalize(image))
}

/// Encode `image` according to the output path's extension.
pub fn save_image(image: &DynamicImage, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("create {} failed", path.display()))?;
    let mut writer = BufWriter::new(file);

    match OutputFormat::from_path(path) {
        OutputFormat::Jpeg => {
            let rgb = image.to_rgb8();
            JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
                .write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
                .with_context(|| format!("encode {} failed", path.display()))?;
        }
        OutputFormat::Png => {
            let image = image_effect::normalize(image.clone());
            PngEncoder::new_with_quality(&mut writer, CompressionType::Best, FilterType::Adaptive)
                .write_image(
                    image.as_bytes(),
                    image.width(),
                    image.height(),
                    image.color().into(),
                )
                .with_context(|| format!("encode {} failed", path.display()))?;
        }
    }

    writer
        .flush()
        .with_context(|| format!("write {} failed", path.display()))?;
    Ok(())
}
