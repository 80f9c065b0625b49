//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the ingestion
//! pipeline needs from an image library: identify (raster probe),
//! read_tags (embedded EXIF), and thumbnail (decode, fit, re-encode).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests swap in the
//! recording `MockBackend` below to drive failure paths.

use super::params::ThumbnailParams;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("failed to encode {path}: {reason}")]
    Encode { path: String, reason: String },
    #[error("no readable tags: {0}")]
    Tags(String),
}

/// Pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Basic properties read straight from the pixel stream header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterInfo {
    pub dimensions: Dimensions,
    pub mime_type: String,
}

/// A raw tag value as stored in the file.
///
/// Rationals are kept as their `"n/d"` text so formatting can tell a
/// `1/250` exposure from a decimal one. Multi-valued tags become a `List`.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Text(String),
    Number(f64),
    List(Vec<TagValue>),
}

impl TagValue {
    /// First scalar of a list, or the value itself.
    pub fn first(&self) -> Option<&TagValue> {
        match self {
            TagValue::List(items) => items.first(),
            scalar => Some(scalar),
        }
    }

    /// Every scalar rendered as text, for DMS components.
    pub fn components(&self) -> Vec<String> {
        match self {
            TagValue::List(items) => items.iter().map(ToString::to_string).collect(),
            scalar => vec![scalar.to_string()],
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Text(s) => f.write_str(s),
            TagValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            TagValue::Number(n) => write!(f, "{n}"),
            TagValue::List(items) => {
                let joined: Vec<String> = items.iter().map(ToString::to_string).collect();
                f.write_str(&joined.join(", "))
            }
        }
    }
}

/// Embedded tag data read from a tag-bearing file (JPEG, TIFF).
///
/// Only the tags the metadata extractor consumes are kept. `file_size` and
/// `mime_type` describe the container the tags were read from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExifTags {
    pub pixel_width: Option<u32>,
    pub pixel_height: Option<u32>,
    pub file_size: Option<u64>,
    pub mime_type: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub date_time_original: Option<String>,
    pub exposure_time: Option<TagValue>,
    pub iso: Option<TagValue>,
    pub f_number: Option<TagValue>,
    pub gps_latitude: Option<TagValue>,
    pub gps_latitude_ref: Option<String>,
    pub gps_longitude: Option<TagValue>,
    pub gps_longitude_ref: Option<String>,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Read width, height and MIME type without decoding pixels.
    fn identify(&self, path: &Path) -> Result<RasterInfo, BackendError>;

    /// Read embedded EXIF tags.
    fn read_tags(&self, path: &Path) -> Result<ExifTags, BackendError>;

    /// Write a bounding-box thumbnail; returns the written dimensions.
    fn thumbnail(&self, params: &ThumbnailParams) -> Result<Dimensions, BackendError>;
}
