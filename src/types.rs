//! Shared types passed between the ingestion stages.
//!
//! Transport hands the pipeline an [`UploadBatch`]; the orchestrator hands
//! each successfully stored file to the catalog as a [`StoredImage`].

use crate::metadata::ImageMetadata;
use crate::validate::TransportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Identity of the user an ingestion runs on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub i64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One submitted file slot, as received by the transport layer.
///
/// Empty slots (nothing selected in that position) are represented too:
/// they carry [`TransportError::NoFile`] or an empty `original_name`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawUploadEntry {
    pub original_name: String,
    pub declared_mime: String,
    /// Fully buffered payload; consumed (moved) by the orchestrator.
    pub temp_path: PathBuf,
    pub byte_size: u64,
    pub transport_error: Option<TransportError>,
}

impl RawUploadEntry {
    /// A successfully received file.
    pub fn received(
        original_name: impl Into<String>,
        temp_path: impl Into<PathBuf>,
        byte_size: u64,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            declared_mime: String::new(),
            temp_path: temp_path.into(),
            byte_size,
            transport_error: None,
        }
    }

    /// A slot with nothing selected.
    pub fn empty_slot() -> Self {
        Self {
            original_name: String::new(),
            declared_mime: String::new(),
            temp_path: PathBuf::new(),
            byte_size: 0,
            transport_error: Some(TransportError::NoFile),
        }
    }

    pub fn is_empty_slot(&self) -> bool {
        self.original_name.is_empty() || self.transport_error == Some(TransportError::NoFile)
    }
}

/// One upload request: ordered entries plus shared annotations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadBatch {
    pub entries: Vec<RawUploadEntry>,
    pub shared_title: String,
    pub shared_description: String,
    pub shared_tags: String,
}

/// Where a stored image's two files live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoragePaths {
    pub original: PathBuf,
    pub thumbnail: PathBuf,
}

/// A fully ingested image: both files written, ready to be cataloged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredImage {
    /// `<token>_<unix-timestamp>.<ext>`, identical in both storage trees.
    pub stored_filename: String,
    pub original_filename: String,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub metadata: ImageMetadata,
    pub storage_paths: StoragePaths,
}
