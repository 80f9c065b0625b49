//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::with_guessed_format` + `into_dimensions` |
//! | EXIF tags | `kamadak-exif` via [`exif_reader`](super::exif_reader) |
//! | Decode (JPEG, PNG, GIF) | `image` crate decoders |
//! | Resample | `image::imageops::resize` with `CatmullRom` (bicubic) |
//! | Encode JPEG | `JpegEncoder::new_with_quality` |
//! | Encode PNG | `PngEncoder::new_with_quality(CompressionType::Best, ...)` |
//! | Encode GIF | `GifEncoder` (default settings) |
//!
//! Decoded and resampled buffers are owned values dropped on every return
//! path, including the early error returns.

use super::backend::{BackendError, Dimensions, ExifTags, ImageBackend, RasterInfo};
use super::calculations::calculate_fit_dimensions;
use super::params::{Quality, ThumbnailFormat, ThumbnailParams};
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ExtendedColorType, ImageReader, Rgba, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image, trusting content over extension.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let decode_err = |e: image::ImageError| BackendError::Decode {
        path: path.display().to_string(),
        reason: e.to_string(),
    };
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(decode_err)
}

/// Resample `img` onto a canvas of exactly `width` x `height`.
///
/// Alpha-capable formats start from a fully transparent canvas and the
/// resampled pixels replace it unblended, so source transparency survives.
/// Everything else is flattened onto opaque black.
fn render_canvas(
    img: &DynamicImage,
    width: u32,
    height: u32,
    format: ThumbnailFormat,
) -> DynamicImage {
    let resampled = imageops::resize(&img.to_rgba8(), width, height, FilterType::CatmullRom);

    if format.supports_alpha() {
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 0]));
        imageops::replace(&mut canvas, &resampled, 0, 0);
        DynamicImage::ImageRgba8(canvas)
    } else {
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
        imageops::overlay(&mut canvas, &resampled, 0, 0);
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
    }
}

/// Encode a rendered thumbnail in its format.
fn save_thumbnail(
    img: &DynamicImage,
    path: &Path,
    format: ThumbnailFormat,
    quality: Quality,
) -> Result<(), BackendError> {
    let encode_err = |e: image::ImageError| BackendError::Encode {
        path: path.display().to_string(),
        reason: e.to_string(),
    };
    let writer = BufWriter::new(File::create(path)?);

    match format {
        ThumbnailFormat::Jpeg => {
            let encoder = JpegEncoder::new_with_quality(writer, quality.value() as u8);
            img.write_with_encoder(encoder).map_err(encode_err)
        }
        ThumbnailFormat::Png => {
            let encoder =
                PngEncoder::new_with_quality(writer, CompressionType::Best, PngFilter::Adaptive);
            img.write_with_encoder(encoder).map_err(encode_err)
        }
        ThumbnailFormat::Gif => {
            let rgb = img.to_rgb8();
            let mut encoder = GifEncoder::new(writer);
            encoder
                .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
                .map_err(encode_err)
        }
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<RasterInfo, BackendError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader
            .format()
            .ok_or_else(|| BackendError::UnsupportedFormat(path.display().to_string()))?;
        let (width, height) = reader.into_dimensions().map_err(|e| BackendError::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(RasterInfo {
            dimensions: Dimensions { width, height },
            mime_type: format.to_mime_type().to_string(),
        })
    }

    fn read_tags(&self, path: &Path) -> Result<ExifTags, BackendError> {
        super::exif_reader::read_exif(path)
    }

    fn thumbnail(&self, params: &ThumbnailParams) -> Result<Dimensions, BackendError> {
        let format = ThumbnailFormat::from_path(&params.source).ok_or_else(|| {
            BackendError::UnsupportedFormat(params.source.display().to_string())
        })?;

        let img = load_image(&params.source)?;
        let (width, height) = calculate_fit_dimensions(
            (img.width(), img.height()),
            (params.max_width, params.max_height),
        )
        .ok_or_else(|| BackendError::Decode {
            path: params.source.display().to_string(),
            reason: "image has a zero dimension".to_string(),
        })?;

        let canvas = render_canvas(&img, width, height, format);
        drop(img);
        save_thumbnail(&canvas, &params.output, format, params.quality)?;
        Ok(Dimensions { width, height })
    }
}
