//! Batch validation.
//!
//! Screens a whole [`UploadBatch`] before any file is touched. Rules, all
//! evaluated and collected:
//!
//! 1. Empty slots are skipped: not counted, not errored.
//! 2. A slot with a transport error yields [`BatchError::Transport`].
//! 3. No selected files at all yields [`BatchError::NoFiles`].
//! 4. More selected files than `max_files` yields [`BatchError::TooManyFiles`].
//! 5. Received bytes above `max_total_size` yields [`BatchError::TotalSizeExceeded`].
//!
//! Any error rejects the batch; the received entries are still listed so the
//! caller can report on them.

use crate::size::format_size_u64;
use crate::types::UploadBatch;
use thiserror::Error;

/// Upload transport failure for one file slot.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    #[error("no file was selected.")]
    NoFile,
    #[error("exceeds server's upload_max_filesize.")]
    IniSize,
    #[error("exceeds form's MAX_FILE_SIZE.")]
    FormSize,
    #[error("was only partially uploaded.")]
    Partial,
    #[error("missing temporary folder.")]
    NoTmpDir,
    #[error("failed to write to disk.")]
    CantWrite,
    #[error("upload stopped by a server extension.")]
    Extension,
    #[error("Unknown error (code: {0}).")]
    Other(i32),
}

impl TransportError {
    /// Map a numeric transport status code. `0` means the file arrived intact.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => None,
            1 => Some(Self::IniSize),
            2 => Some(Self::FormSize),
            3 => Some(Self::Partial),
            4 => Some(Self::NoFile),
            6 => Some(Self::NoTmpDir),
            7 => Some(Self::CantWrite),
            8 => Some(Self::Extension),
            other => Some(Self::Other(other)),
        }
    }
}

/// A reason the whole batch was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    #[error("Upload error for '{filename}': {error}")]
    Transport {
        filename: String,
        error: TransportError,
    },
    #[error("Please select at least one image.")]
    NoFiles,
    #[error("Max {limit} images. You selected {count}.")]
    TooManyFiles { limit: usize, count: usize },
    #[error("Total size ({}) exceeds limit of {}.", size_label(.total), size_label(.limit))]
    TotalSizeExceeded { total: u64, limit: u64 },
}

fn size_label(bytes: &u64) -> String {
    format_size_u64(*bytes)
}

/// Per-batch limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub max_files: usize,
    pub max_total_size: u64,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_files: 20,
            max_total_size: 20 * 1024 * 1024,
        }
    }
}

/// Outcome of screening a batch. Indices refer to `UploadBatch::entries`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationVerdict {
    Accepted(Vec<usize>),
    Rejected {
        errors: Vec<BatchError>,
        received: Vec<usize>,
    },
}

impl ValidationVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn errors(&self) -> &[BatchError] {
        match self {
            Self::Accepted(_) => &[],
            Self::Rejected { errors, .. } => errors,
        }
    }
}

/// Screen a batch against the limits.
pub fn validate_batch(batch: &UploadBatch, limits: &BatchLimits) -> ValidationVerdict {
    let mut errors = Vec::new();
    let mut received = Vec::new();
    let mut selected = 0usize;
    let mut total_size = 0u64;

    for (index, entry) in batch.entries.iter().enumerate() {
        if entry.is_empty_slot() {
            continue;
        }
        selected += 1;
        match entry.transport_error {
            Some(error) => errors.push(BatchError::Transport {
                filename: entry.original_name.clone(),
                error,
            }),
            None => {
                total_size = total_size.saturating_add(entry.byte_size);
                received.push(index);
            }
        }
    }

    if selected == 0 {
        errors.push(BatchError::NoFiles);
    }
    if selected > limits.max_files {
        errors.push(BatchError::TooManyFiles {
            limit: limits.max_files,
            count: selected,
        });
    }
    if total_size > limits.max_total_size {
        errors.push(BatchError::TotalSizeExceeded {
            total: total_size,
            limit: limits.max_total_size,
        });
    }

    if errors.is_empty() {
        ValidationVerdict::Accepted(received)
    } else {
        ValidationVerdict::Rejected { errors, received }
    }
}
