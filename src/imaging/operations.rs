//! High-level image operations.
//!
//! These functions take configuration, build operation parameters, and hand
//! them to the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{Quality, ThumbnailParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Bounding box and encoding quality for thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            max_width: 500,
            max_height: 500,
            quality: Quality::default(),
        }
    }
}

/// Plan a thumbnail operation without executing it.
pub fn plan_thumbnail(source: &Path, target: &Path, config: &ThumbnailConfig) -> ThumbnailParams {
    ThumbnailParams {
        source: source.to_path_buf(),
        output: target.to_path_buf(),
        max_width: config.max_width,
        max_height: config.max_height,
        quality: config.quality,
    }
}

/// Create a thumbnail of `source` at `target`, in the source's format.
///
/// The source is never modified. An existing target is overwritten.
pub fn create_thumbnail(
    backend: &impl ImageBackend,
    source: &Path,
    target: &Path,
    config: &ThumbnailConfig,
) -> Result<Dimensions> {
    let params = plan_thumbnail(source, target, config);
    backend.thumbnail(&params)
}
