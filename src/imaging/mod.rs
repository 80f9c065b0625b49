//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader` (format sniffing + header dimensions) |
//! | **EXIF tags** | `kamadak-exif` (JPEG APP1 / TIFF IFD) |
//! | **Thumbnail** | CatmullRom resize onto a format-appropriate canvas |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions turning config into backend calls

pub mod backend;
mod calculations;
pub mod exif_reader;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ExifTags, ImageBackend, RasterInfo, TagValue};
pub use calculations::calculate_fit_dimensions;
pub use exif_reader::has_embedded_tags;
pub use operations::{ThumbnailConfig, create_thumbnail};
pub use params::{Quality, ThumbnailFormat, ThumbnailParams};
pub use rust_backend::RustBackend;
