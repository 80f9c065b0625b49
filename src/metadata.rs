//! Image metadata extraction.
//!
//! Every stored image carries a small metadata document derived from two
//! independent sources:
//!
//! ## Embedded tags
//!
//! Read only for tag-bearing formats (JPEG, TIFF). Camera, capture time,
//! exposure, ISO, aperture and GPS come exclusively from here. Pixel size,
//! MIME type and file size are also taken from the tag reader when present.
//!
//! ## Raster probe and filesystem
//!
//! The pixel stream header is always probed for width, height and MIME type,
//! and the on-disk size is always available. These fill `dimensions`,
//! `mimetype` and `filesize` only when the tags did not.
//!
//! ## Resolution
//!
//! Each field is resolved independently; the first non-empty value wins and a
//! failure in one source never blocks another. Nothing here returns an error:
//! unreadable tags or an unprobeable file just yield a sparser document.

use crate::gps::{Hemisphere, gps_to_decimal};
use crate::imaging::{ExifTags, ImageBackend, TagValue, has_embedded_tags};
use crate::rational::{decode_rational, parse_number, split_fraction};
use crate::size::format_size_u64;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Derived metadata for one image. Absent fields are omitted when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesize: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_taken: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exposure: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ImageMetadata {
    /// Present fields as `(key, value)` pairs in canonical key order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("dimensions", &self.dimensions),
            ("filesize", &self.filesize),
            ("mimetype", &self.mimetype),
            ("camera", &self.camera),
            ("date_taken", &self.date_taken),
            ("exposure", &self.exposure),
            ("iso", &self.iso),
            ("aperture", &self.aperture),
            ("location", &self.location),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Resolve a metadata field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value, trimmed.
///
/// ```text
/// dimensions: resolve(&[tag_dimensions, raster_dimensions])
/// date_taken: resolve(&[tag_capture_time])
/// ```
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Extract the metadata document for an image file.
pub fn extract_metadata(backend: &impl ImageBackend, path: &Path) -> ImageMetadata {
    let tags = if has_embedded_tags(path) {
        backend.read_tags(path).unwrap_or_else(|e| {
            debug!(path = %path.display(), error = %e, "no embedded tags");
            ExifTags::default()
        })
    } else {
        ExifTags::default()
    };

    let raster = backend
        .identify(path)
        .inspect_err(|e| debug!(path = %path.display(), error = %e, "raster probe failed"))
        .ok();
    let disk_size = std::fs::metadata(path)
        .inspect_err(|e| debug!(path = %path.display(), error = %e, "stat failed"))
        .ok()
        .map(|m| format_size_u64(m.len()));

    let tag_dimensions = match (tags.pixel_width, tags.pixel_height) {
        (Some(w), Some(h)) => Some(format!("{w} x {h}")),
        _ => None,
    };
    let raster_dimensions = raster
        .as_ref()
        .map(|r| format!("{} x {}", r.dimensions.width, r.dimensions.height));
    let tag_size = tags.file_size.map(format_size_u64);

    ImageMetadata {
        dimensions: resolve(&[tag_dimensions.as_deref(), raster_dimensions.as_deref()]),
        filesize: resolve(&[tag_size.as_deref(), disk_size.as_deref()]),
        mimetype: resolve(&[
            tags.mime_type.as_deref(),
            raster.as_ref().map(|r| r.mime_type.as_str()),
        ]),
        camera: format_camera(tags.make.as_deref(), tags.model.as_deref()),
        date_taken: resolve(&[tags.date_time_original.as_deref()]),
        exposure: tags.exposure_time.as_ref().and_then(format_exposure),
        iso: tags.iso.as_ref().and_then(format_iso),
        aperture: tags.f_number.as_ref().and_then(format_aperture),
        location: format_location(&tags),
    }
}

/// `"Make Model"`, only when both are present.
pub fn format_camera(make: Option<&str>, model: Option<&str>) -> Option<String> {
    let make = resolve(&[make])?;
    let model = resolve(&[model])?;
    Some(format!("{make} {model}"))
}

/// Render an exposure time.
///
/// - `"1/d"` fractions are kept verbatim: `"1/250"` → `"1/250 sec"`.
/// - Other fractions become a 4-place decimal: `"2/1"` → `"2.0000 sec"`.
/// - Numbers below one become a unit fraction: `0.5` → `"1/2 sec"`.
/// - Numbers of one or more keep two places: `2` → `"2.00 sec"`.
///
/// Anything else (zero or negative values, zero denominators, exposures too
/// short for a `u64` denominator, text that is not a number) yields `None`.
pub fn format_exposure(value: &TagValue) -> Option<String> {
    match value.first()? {
        TagValue::Text(text) => {
            let text = text.trim();
            if text.contains('/') {
                let (num, den) = split_fraction(text)?;
                if den == 0.0 {
                    None
                } else if num == 1.0 {
                    Some(format!("{text} sec"))
                } else {
                    Some(format!("{:.4} sec", num / den))
                }
            } else {
                format_exposure_seconds(parse_number(text)?)
            }
        }
        TagValue::Number(seconds) => format_exposure_seconds(*seconds),
        TagValue::List(_) => None,
    }
}

fn format_exposure_seconds(seconds: f64) -> Option<String> {
    if seconds <= 0.0 {
        None
    } else if seconds < 1.0 {
        let denominator = (1.0 / seconds).round();
        if !denominator.is_finite() || denominator >= u64::MAX as f64 {
            return None;
        }
        Some(format!("1/{} sec", denominator as u64))
    } else {
        Some(format!("{seconds:.2} sec"))
    }
}

/// `"ISO <first value>"`.
pub fn format_iso(value: &TagValue) -> Option<String> {
    let first = value.first()?.to_string();
    resolve(&[Some(first.as_str())]).map(|iso| format!("ISO {iso}"))
}

/// `"f/<n.n>"` from an f-number rational.
pub fn format_aperture(value: &TagValue) -> Option<String> {
    let f_number = decode_rational(&value.first()?.to_string());
    Some(format!("f/{f_number:.1}"))
}

/// `"<lat>, <lng>"` to six places, when both coordinates and both
/// hemisphere references are present and valid.
pub fn format_location(tags: &ExifTags) -> Option<String> {
    let lat_ref: Hemisphere = tags.gps_latitude_ref.as_deref()?.parse().ok()?;
    let lng_ref: Hemisphere = tags.gps_longitude_ref.as_deref()?.parse().ok()?;
    let lat = gps_to_decimal(&tags.gps_latitude.as_ref()?.components(), lat_ref);
    let lng = gps_to_decimal(&tags.gps_longitude.as_ref()?.components(), lng_ref);
    Some(format!("{lat:.6}, {lng:.6}"))
}
