//! Shared test utilities for the snapshelf test suite.
//!
//! Provides synthetic image fixtures, EXIF-bearing JPEGs, upload staging and
//! an in-memory catalog.
//!
//! # Usage
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let config = test_config(tmp.path());
//! let entry = stage_upload(tmp.path(), "a.jpg", |p| create_test_jpeg(p, 64, 48));
//! let mut catalog = MemoryCatalog::default();
//! ```

use crate::config::IngestConfig;
use crate::ingest::{Catalog, PersistError};
use crate::types::{OwnerId, RawUploadEntry, StoredImage};
use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::{ImageFormat, Rgba, RgbaImage, RgbImage};
use std::fs;
use std::io::Cursor;
use std::path::Path;

// =========================================================================
// Synthetic images
// =========================================================================

fn gradient_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Write an opaque gradient JPEG.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    gradient_rgb(width, height)
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

/// Write an opaque RGBA PNG.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 64, 255])
    })
    .save_with_format(path, ImageFormat::Png)
    .unwrap();
}

/// Write a PNG whose left half is fully transparent and right half opaque red.
pub fn create_transparent_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([255, 0, 0, 255])
        }
    })
    .save_with_format(path, ImageFormat::Png)
    .unwrap();
}

/// Write an opaque GIF.
pub fn create_test_gif(path: &Path, width: u32, height: u32) {
    RgbaImage::from_fn(width, height, |x, _| {
        if x % 2 == 0 {
            Rgba([0, 0, 255, 255])
        } else {
            Rgba([255, 255, 0, 255])
        }
    })
    .save_with_format(path, ImageFormat::Gif)
    .unwrap();
}

// =========================================================================
// EXIF fixtures
// =========================================================================

/// Tag values embedded by [`write_jpeg_with_exif`].
#[derive(Debug, Clone)]
pub struct ExifFixture {
    pub make: &'static str,
    pub model: &'static str,
    pub date_time_original: &'static str,
    pub exposure: (u32, u32),
    pub iso: u16,
    pub f_number: (u32, u32),
    pub latitude: [(u32, u32); 3],
    pub latitude_ref: &'static str,
    pub longitude: [(u32, u32); 3],
    pub longitude_ref: &'static str,
    pub pixel_dimensions: Option<(u32, u32)>,
}

impl ExifFixture {
    /// A Canon shot at 40°30'N 73°58'W, 1/250 s, ISO 400, f/2.8,
    /// claiming 4000x3000 pixels.
    pub fn sample() -> Self {
        Self {
            make: "Canon",
            model: "EOS 5D",
            date_time_original: "2024:05:01 12:00:00",
            exposure: (1, 250),
            iso: 400,
            f_number: (28, 10),
            latitude: [(40, 1), (30, 1), (0, 1)],
            latitude_ref: "N",
            longitude: [(73, 1), (58, 1), (0, 1)],
            longitude_ref: "W",
            pixel_dimensions: Some((4000, 3000)),
        }
    }

    fn fields(&self) -> Vec<Field> {
        let ascii = |s: &str| Value::Ascii(vec![s.as_bytes().to_vec()]);
        let rational = |(num, denom): (u32, u32)| Rational { num, denom };
        let field = |tag: Tag, value: Value| Field {
            tag,
            ifd_num: In::PRIMARY,
            value,
        };

        let mut fields = vec![
            field(Tag::Make, ascii(self.make)),
            field(Tag::Model, ascii(self.model)),
            field(Tag::DateTimeOriginal, ascii(self.date_time_original)),
            field(Tag::ExposureTime, Value::Rational(vec![rational(self.exposure)])),
            field(Tag::PhotographicSensitivity, Value::Short(vec![self.iso])),
            field(Tag::FNumber, Value::Rational(vec![rational(self.f_number)])),
            field(
                Tag::GPSLatitude,
                Value::Rational(self.latitude.iter().copied().map(rational).collect()),
            ),
            field(Tag::GPSLatitudeRef, ascii(self.latitude_ref)),
            field(
                Tag::GPSLongitude,
                Value::Rational(self.longitude.iter().copied().map(rational).collect()),
            ),
            field(Tag::GPSLongitudeRef, ascii(self.longitude_ref)),
        ];
        if let Some((w, h)) = self.pixel_dimensions {
            fields.push(field(Tag::PixelXDimension, Value::Long(vec![w])));
            fields.push(field(Tag::PixelYDimension, Value::Long(vec![h])));
        }
        fields
    }
}

/// Write a gradient JPEG carrying the fixture's tags in an APP1 segment.
pub fn write_jpeg_with_exif(path: &Path, width: u32, height: u32, fixture: &ExifFixture) {
    let mut jpeg = Vec::new();
    gradient_rgb(width, height)
        .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .unwrap();

    let fields = fixture.fields();
    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    let tiff = tiff.into_inner();

    let segment_len = u16::try_from(2 + 6 + tiff.len()).unwrap();
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]); // SOI
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    fs::write(path, out).unwrap();
}

// =========================================================================
// Ingestion fixtures
// =========================================================================

/// Config with both storage trees and the catalog under `root/uploads`.
pub fn test_config(root: &Path) -> IngestConfig {
    let mut config = IngestConfig::default();
    config.storage.originals_dir = root.join("uploads/images");
    config.storage.thumbnails_dir = root.join("uploads/thumbnails");
    config.storage.catalog_file = root.join("uploads/catalog.json");
    config
}

/// Stage an upload payload under `root/incoming` and describe it as a
/// received entry named `name`. `write` creates the payload file.
pub fn stage_upload(root: &Path, name: &str, write: impl FnOnce(&Path)) -> RawUploadEntry {
    let incoming = root.join("incoming");
    fs::create_dir_all(&incoming).unwrap();
    let slot = fs::read_dir(&incoming).unwrap().count();
    let payload = incoming.join(format!("{slot}-{name}"));
    write(&payload);
    let size = fs::metadata(&payload).unwrap().len();
    RawUploadEntry::received(name, payload, size)
}

/// In-memory catalog recording every saved image.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    pub records: Vec<(OwnerId, StoredImage)>,
    pub fail: bool,
}

impl MemoryCatalog {
    /// A catalog that rejects every save.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

impl Catalog for MemoryCatalog {
    fn save(&mut self, owner: OwnerId, image: &StoredImage) -> Result<(), PersistError> {
        if self.fail {
            return Err(PersistError::new("catalog unavailable"));
        }
        self.records.push((owner, image.clone()));
        Ok(())
    }
}
