//! EXIF tag reader built on `kamadak-exif`.
//!
//! Reads the primary IFD (plus its EXIF and GPS sub-IFDs) from a JPEG or
//! TIFF container and keeps only the tags [`ExifTags`] names. Values are
//! converted to [`TagValue`] with rationals rendered as `"n/d"` text, so the
//! metadata layer sees the same shapes regardless of how a camera encoded
//! them.

use super::backend::{BackendError, ExifTags, TagValue};
use exif::{Exif, In, Reader, Tag, Value};
use std::io::Cursor;
use std::path::Path;

/// Extensions whose containers may carry EXIF tags.
const TAG_BEARING_EXTENSIONS: &[&str] = &["jpg", "jpeg", "tif", "tiff"];

/// Whether a file's extension marks it as a tag-bearing format.
pub fn has_embedded_tags(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            TAG_BEARING_EXTENSIONS
                .iter()
                .any(|t| t.eq_ignore_ascii_case(e))
        })
}

/// Read the EXIF tags the metadata extractor consumes.
///
/// Fails when the file can't be read or carries no parseable EXIF block;
/// callers treat that as an empty tag set.
pub fn read_exif(path: &Path) -> Result<ExifTags, BackendError> {
    let bytes = std::fs::read(path)?;
    let exif = Reader::new()
        .read_from_container(&mut Cursor::new(&bytes))
        .map_err(|e| BackendError::Tags(format!("{}: {e}", path.display())))?;

    let mut tags = tags_from_exif(&exif);
    tags.file_size = Some(bytes.len() as u64);
    tags.mime_type = image::guess_format(&bytes)
        .ok()
        .map(|f| f.to_mime_type().to_string());
    Ok(tags)
}

fn tags_from_exif(exif: &Exif) -> ExifTags {
    let field = |tag: Tag| exif.get_field(tag, In::PRIMARY);
    let text = |tag: Tag| field(tag).and_then(|f| ascii_value(&f.value));
    let value = |tag: Tag| field(tag).and_then(|f| tag_value(&f.value));
    let uint = |tag: Tag| field(tag).and_then(|f| f.value.get_uint(0));

    ExifTags {
        pixel_width: uint(Tag::PixelXDimension),
        pixel_height: uint(Tag::PixelYDimension),
        file_size: None,
        mime_type: None,
        make: text(Tag::Make),
        model: text(Tag::Model),
        date_time_original: text(Tag::DateTimeOriginal),
        exposure_time: value(Tag::ExposureTime),
        iso: value(Tag::PhotographicSensitivity),
        f_number: value(Tag::FNumber),
        gps_latitude: value(Tag::GPSLatitude),
        gps_latitude_ref: text(Tag::GPSLatitudeRef),
        gps_longitude: value(Tag::GPSLongitude),
        gps_longitude_ref: text(Tag::GPSLongitudeRef),
    }
}

/// First ASCII string of a value, NUL padding and whitespace trimmed.
fn ascii_value(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(values) => values
            .first()
            .map(|raw| String::from_utf8_lossy(raw).trim_matches('\0').trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Convert any scalar or multi-valued EXIF value into a [`TagValue`].
fn tag_value(value: &Value) -> Option<TagValue> {
    fn numbers<T: Copy + Into<f64>>(values: &[T]) -> Vec<TagValue> {
        values.iter().map(|v| TagValue::Number((*v).into())).collect()
    }

    let mut items: Vec<TagValue> = match value {
        Value::Ascii(_) => return ascii_value(value).map(TagValue::Text),
        Value::Rational(values) => values
            .iter()
            .map(|r| TagValue::Text(format!("{}/{}", r.num, r.denom)))
            .collect(),
        Value::SRational(values) => values
            .iter()
            .map(|r| TagValue::Text(format!("{}/{}", r.num, r.denom)))
            .collect(),
        Value::Byte(values) => numbers(values),
        Value::Short(values) => numbers(values),
        Value::Long(values) => numbers(values),
        Value::SByte(values) => numbers(values),
        Value::SShort(values) => numbers(values),
        Value::SLong(values) => numbers(values),
        Value::Float(values) => numbers(values),
        Value::Double(values) => numbers(values),
        _ => return None,
    };

    match items.len() {
        0 => None,
        1 => items.pop(),
        _ => Some(TagValue::List(items)),
    }
}
