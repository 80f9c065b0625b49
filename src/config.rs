//! Ingestion configuration.
//!
//! Handles loading, validating, and merging `snapshelf.toml`. Stock defaults
//! are serialized to a TOML value, the user file is merged on top key by key,
//! and the result is deserialized and validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [limits]
//! max_files = 20                 # Files per upload batch
//! max_total_size = 20971520      # Bytes per upload batch (20 MB)
//!
//! [thumbnails]
//! max_width = 500                # Bounding box, pixels
//! max_height = 500
//! jpeg_quality = 90              # 1-100
//!
//! [storage]
//! originals_dir = "uploads/images"
//! thumbnails_dir = "uploads/thumbnails"
//! catalog_file = "uploads/catalog.json"
//!
//! [naming]
//! token_length = 10              # Random characters in stored filenames
//! max_attempts = 8               # Fresh tokens tried before giving up
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! [thumbnails]
//! max_width = 320
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Quality, ThumbnailConfig};
use crate::validate::BatchLimits;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Ingestion configuration loaded from `snapshelf.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Per-batch file count and size limits.
    pub limits: LimitsConfig,
    /// Thumbnail bounding box and quality.
    pub thumbnails: ThumbnailsConfig,
    /// Storage directories and catalog location.
    pub storage: StorageConfig,
    /// Stored filename generation.
    pub naming: NamingConfig,
}

impl IngestConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_files == 0 || self.limits.max_total_size == 0 {
            return Err(ConfigError::Validation(
                "limits.max_files and limits.max_total_size must be non-zero".into(),
            ));
        }
        if self.thumbnails.max_width == 0 || self.thumbnails.max_height == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.max_width and thumbnails.max_height must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnails.jpeg_quality) {
            return Err(ConfigError::Validation(
                "thumbnails.jpeg_quality must be 1-100".into(),
            ));
        }
        let dirs = [
            ("storage.originals_dir", &self.storage.originals_dir),
            ("storage.thumbnails_dir", &self.storage.thumbnails_dir),
            ("storage.catalog_file", &self.storage.catalog_file),
        ];
        for (key, path) in dirs {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.storage.originals_dir == self.storage.thumbnails_dir {
            return Err(ConfigError::Validation(
                "storage.originals_dir and storage.thumbnails_dir must differ".into(),
            ));
        }
        if self.naming.token_length == 0 || self.naming.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "naming.token_length and naming.max_attempts must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub fn batch_limits(&self) -> BatchLimits {
        BatchLimits {
            max_files: self.limits.max_files,
            max_total_size: self.limits.max_total_size,
        }
    }

    pub fn thumbnail_config(&self) -> ThumbnailConfig {
        ThumbnailConfig {
            max_width: self.thumbnails.max_width,
            max_height: self.thumbnails.max_height,
            quality: Quality::new(self.thumbnails.jpeg_quality),
        }
    }
}

/// Per-batch limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    pub max_files: usize,
    /// Bytes.
    pub max_total_size: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        let limits = BatchLimits::default();
        Self {
            max_files: limits.max_files,
            max_total_size: limits.max_total_size,
        }
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG encoding quality (1-100). PNG is always written at maximum
    /// compression and GIF with encoder defaults.
    pub jpeg_quality: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            max_width: 500,
            max_height: 500,
            jpeg_quality: 90,
        }
    }
}

/// Storage layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub originals_dir: PathBuf,
    pub thumbnails_dir: PathBuf,
    pub catalog_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            originals_dir: PathBuf::from("uploads/images"),
            thumbnails_dir: PathBuf::from("uploads/thumbnails"),
            catalog_file: PathBuf::from("uploads/catalog.json"),
        }
    }
}

/// Stored filename generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    pub token_length: usize,
    pub max_attempts: u32,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            token_length: crate::naming::TOKEN_LENGTH,
            max_attempts: 8,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(IngestConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<IngestConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: IngestConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result. A missing file yields the stock defaults.
pub fn load_config(path: &Path) -> Result<IngestConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `snapshelf.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Snapshelf Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Upload batch limits
# ---------------------------------------------------------------------------
[limits]
# Maximum number of files in one upload batch.
max_files = 20

# Maximum combined size of one upload batch, in bytes (20 MB).
max_total_size = 20971520

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Bounding box in pixels. The image is scaled by a single ratio so that it
# fits the box exactly on one edge; the aspect ratio is preserved.
max_width = 500
max_height = 500

# JPEG encoding quality (1 = worst, 100 = best).
# PNG thumbnails always use maximum compression; GIF uses encoder defaults.
jpeg_quality = 90

# ---------------------------------------------------------------------------
# Storage
# ---------------------------------------------------------------------------
[storage]
# Full-resolution originals and thumbnails live in two parallel trees,
# keyed by the same generated filename.
originals_dir = "uploads/images"
thumbnails_dir = "uploads/thumbnails"

# JSON catalog of ingested images.
catalog_file = "uploads/catalog.json"

# ---------------------------------------------------------------------------
# Stored filenames: <token>_<unix-timestamp>.<ext>
# ---------------------------------------------------------------------------
[naming]
# Random alphanumeric characters per token.
token_length = 10

# Fresh tokens tried when a generated name is already in use.
max_attempts = 8
"##
}
