//! Batch ingestion.
//!
//! Drives one [`UploadBatch`] end to end:
//!
//! 1. **Validate** the whole batch. Any batch error stops here, before a
//!    single file is touched.
//! 2. For each accepted entry, strictly in order:
//!    extension check → stored name → storage dirs → move original →
//!    thumbnail → metadata → catalog.
//!
//! Each file succeeds or fails on its own; one failure never stops its
//! siblings. A file whose thumbnail fails has its original deleted again, so
//! storage never holds an original without a thumbnail. A catalog failure
//! leaves both files in place.

use crate::config::IngestConfig;
use crate::imaging::{BackendError, ImageBackend, RustBackend, ThumbnailFormat, create_thumbnail};
use crate::metadata::extract_metadata;
use crate::naming::{NamingError, file_extension, generate_unique_name, title_from_filename};
use crate::storage::StorageLayout;
use crate::types::{OwnerId, RawUploadEntry, StoredImage, UploadBatch};
use crate::validate::{BatchError, ValidationVerdict, validate_batch};
use std::io;
use thiserror::Error;
use tracing::{info, warn};

/// The catalog declined or failed to save a record.
#[derive(Error, Debug)]
#[error("{reason}")]
pub struct PersistError {
    pub reason: String,
}

impl PersistError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Persistence collaborator: receives each successfully stored image.
pub trait Catalog {
    fn save(&mut self, owner: OwnerId, image: &StoredImage) -> Result<(), PersistError>;
}

/// Why one accepted file was not ingested.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Invalid format for '{filename}'. JPG, PNG, GIF only.")]
    UnsupportedFormat { filename: String },
    #[error("Error naming '{filename}': {source}")]
    Naming {
        filename: String,
        source: NamingError,
    },
    #[error("Error preparing storage for '{filename}': {source}")]
    CreateDirs { filename: String, source: io::Error },
    #[error("Error moving '{filename}': {source}")]
    StoreOriginal { filename: String, source: io::Error },
    #[error("Error creating thumbnail for '{filename}': {source}")]
    Thumbnail {
        filename: String,
        source: BackendError,
    },
    #[error("Error saving '{filename}' to catalog: {source}")]
    Persist {
        filename: String,
        source: PersistError,
    },
}

/// Result for one attempted file.
#[derive(Debug)]
pub struct FileOutcome {
    pub original_filename: String,
    pub result: Result<StoredImage, FileError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything one ingestion call produced.
///
/// When `batch_errors` is non-empty the batch was rejected and `outcomes`
/// is empty. Otherwise there is one outcome per accepted entry, in order.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub batch_errors: Vec<BatchError>,
    pub outcomes: Vec<FileOutcome>,
}

impl IngestReport {
    pub fn stored(&self) -> impl Iterator<Item = &StoredImage> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }

    /// Whether anything was rejected, at batch or file level.
    pub fn has_failures(&self) -> bool {
        !self.batch_errors.is_empty() || self.failures().next().is_some()
    }
}

/// Ingest a batch with the pure Rust image backend.
pub fn ingest(
    batch: &UploadBatch,
    owner: OwnerId,
    config: &IngestConfig,
    catalog: &mut impl Catalog,
) -> IngestReport {
    ingest_with_backend(&RustBackend::new(), batch, owner, config, catalog)
}

/// Ingest a batch with an explicit backend.
pub fn ingest_with_backend(
    backend: &impl ImageBackend,
    batch: &UploadBatch,
    owner: OwnerId,
    config: &IngestConfig,
    catalog: &mut impl Catalog,
) -> IngestReport {
    let accepted = match validate_batch(batch, &config.batch_limits()) {
        ValidationVerdict::Accepted(indices) => indices,
        ValidationVerdict::Rejected { errors, .. } => {
            for error in &errors {
                warn!(%error, "batch rejected");
            }
            return IngestReport {
                batch_errors: errors,
                outcomes: Vec::new(),
            };
        }
    };

    let layout = StorageLayout::from_config(&config.storage);
    let outcomes = accepted
        .into_iter()
        .filter_map(|index| batch.entries.get(index))
        .map(|entry| {
            let result = ingest_file(backend, entry, batch, owner, config, &layout, catalog);
            if let Err(e) = &result {
                warn!(error = %e, "file not ingested");
            }
            FileOutcome {
                original_filename: entry.original_name.clone(),
                result,
            }
        })
        .collect();

    IngestReport {
        batch_errors: Vec::new(),
        outcomes,
    }
}

fn ingest_file(
    backend: &impl ImageBackend,
    entry: &RawUploadEntry,
    batch: &UploadBatch,
    owner: OwnerId,
    config: &IngestConfig,
    layout: &StorageLayout,
    catalog: &mut impl Catalog,
) -> Result<StoredImage, FileError> {
    let filename = entry.original_name.clone();

    let ext = file_extension(&filename)
        .filter(|e| ThumbnailFormat::from_extension(e).is_some())
        .ok_or_else(|| FileError::UnsupportedFormat {
            filename: filename.clone(),
        })?;

    let stored_filename = generate_unique_name(
        &mut rand::rng(),
        config.naming.token_length,
        chrono::Utc::now().timestamp(),
        &ext,
        config.naming.max_attempts,
        |candidate| layout.is_taken(candidate),
    )
    .map_err(|source| FileError::Naming {
        filename: filename.clone(),
        source,
    })?;

    layout
        .ensure_dirs()
        .map_err(|source| FileError::CreateDirs {
            filename: filename.clone(),
            source,
        })?;

    let paths = layout.paths_for(&stored_filename);
    layout
        .store_original(&entry.temp_path, &stored_filename)
        .map_err(|source| FileError::StoreOriginal {
            filename: filename.clone(),
            source,
        })?;

    if let Err(source) = create_thumbnail(
        backend,
        &paths.original,
        &paths.thumbnail,
        &config.thumbnail_config(),
    ) {
        if let Err(e) = layout.remove(&stored_filename) {
            warn!(file = %stored_filename, error = %e, "cleanup after thumbnail failure failed");
        }
        return Err(FileError::Thumbnail { filename, source });
    }

    let metadata = extract_metadata(backend, &paths.original);
    let title = if batch.shared_title.trim().is_empty() {
        title_from_filename(&filename)
    } else {
        batch.shared_title.clone()
    };
    let image = StoredImage {
        stored_filename,
        original_filename: filename.clone(),
        title,
        description: batch.shared_description.clone(),
        tags: batch.shared_tags.clone(),
        metadata,
        storage_paths: paths,
    };

    catalog
        .save(owner, &image)
        .map_err(|source| FileError::Persist { filename, source })?;

    info!(
        original = %image.original_filename,
        stored = %image.stored_filename,
        %owner,
        "image stored"
    );
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::test_helpers::{
        MemoryCatalog, create_test_jpeg, create_test_png, stage_upload, test_config,
    };
    use std::fs;
    use tempfile::TempDir;

    fn batch_of(entries: Vec<RawUploadEntry>) -> UploadBatch {
        UploadBatch {
            entries,
            ..UploadBatch::default()
        }
    }

    fn dir_len(path: &std::path::Path) -> usize {
        fs::read_dir(path).map(|d| d.count()).unwrap_or(0)
    }

    #[test]
    fn stores_file_and_saves_record() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        let entry = stage_upload(tmp.path(), "Sunset.PNG", |p| create_test_png(p, 40, 20));
        let batch = UploadBatch {
            shared_description: "evening".into(),
            shared_tags: "sky, beach".into(),
            ..batch_of(vec![entry])
        };
        let mut catalog = MemoryCatalog::default();

        let report = ingest(&batch, OwnerId(3), &config, &mut catalog);

        assert!(!report.has_failures());
        let image = report.stored().next().unwrap();
        assert!(image.stored_filename.ends_with(".png"));
        assert_eq!(image.original_filename, "Sunset.PNG");
        assert_eq!(image.title, "Sunset");
        assert_eq!(image.description, "evening");
        assert_eq!(image.tags, "sky, beach");
        assert!(image.storage_paths.original.exists());
        assert!(image.storage_paths.thumbnail.exists());
        assert_eq!(image.metadata.dimensions.as_deref(), Some("40 x 20"));
        assert_eq!(catalog.records, vec![(OwnerId(3), image.clone())]);
    }

    #[test]
    fn shared_title_wins_over_filename() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        let entry = stage_upload(tmp.path(), "a.jpg", |p| create_test_jpeg(p, 10, 10));
        let batch = UploadBatch {
            shared_title: "Holiday".into(),
            ..batch_of(vec![entry])
        };

        let report = ingest(&batch, OwnerId(1), &config, &mut MemoryCatalog::default());
        assert_eq!(report.stored().next().unwrap().title, "Holiday");
    }

    #[test]
    fn non_blank_title_is_stored_as_given() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        let entry = stage_upload(tmp.path(), "a.jpg", |p| create_test_jpeg(p, 10, 10));
        let batch = UploadBatch {
            shared_title: "  Holiday ".into(),
            ..batch_of(vec![entry])
        };

        let report = ingest(&batch, OwnerId(1), &config, &mut MemoryCatalog::default());
        assert_eq!(report.stored().next().unwrap().title, "  Holiday ");
    }

    #[test]
    fn whitespace_title_falls_back_to_filename() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        let entry = stage_upload(tmp.path(), "my photo.jpeg", |p| create_test_jpeg(p, 10, 10));
        let batch = UploadBatch {
            shared_title: "   ".into(),
            ..batch_of(vec![entry])
        };

        let report = ingest(&batch, OwnerId(1), &config, &mut MemoryCatalog::default());
        assert_eq!(report.stored().next().unwrap().title, "my photo");
    }

    #[test]
    fn rejected_batch_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut config = test_config(tmp.path());
        config.limits.max_files = 1;
        let entries = vec![
            stage_upload(tmp.path(), "a.jpg", |p| create_test_jpeg(p, 10, 10)),
            stage_upload(tmp.path(), "b.jpg", |p| create_test_jpeg(p, 10, 10)),
        ];
        let backend = MockBackend::new();
        let mut catalog = MemoryCatalog::default();

        let report =
            ingest_with_backend(&backend, &batch_of(entries), OwnerId(1), &config, &mut catalog);

        assert_eq!(
            report.batch_errors,
            vec![BatchError::TooManyFiles { limit: 1, count: 2 }]
        );
        assert!(report.outcomes.is_empty());
        assert!(backend.get_operations().is_empty());
        assert!(!config.storage.originals_dir.exists());
        assert!(catalog.records.is_empty());
    }

    #[test]
    fn unsupported_extension_fails_only_that_file() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        let entries = vec![
            stage_upload(tmp.path(), "notes.txt", |p| fs::write(p, b"hi").unwrap()),
            stage_upload(tmp.path(), "ok.png", |p| create_test_png(p, 8, 8)),
        ];

        let report = ingest(
            &batch_of(entries),
            OwnerId(1),
            &config,
            &mut MemoryCatalog::default(),
        );

        assert_eq!(report.outcomes.len(), 2);
        let err = report.outcomes[0].result.as_ref().unwrap_err();
        assert!(matches!(err, FileError::UnsupportedFormat { .. }));
        assert_eq!(
            err.to_string(),
            "Invalid format for 'notes.txt'. JPG, PNG, GIF only."
        );
        assert!(report.outcomes[1].is_success());
    }

    #[test]
    fn dotfile_upload_is_accepted() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        let entry = stage_upload(tmp.path(), ".jpg", |p| create_test_jpeg(p, 10, 10));

        let report = ingest(
            &batch_of(vec![entry]),
            OwnerId(1),
            &config,
            &mut MemoryCatalog::default(),
        );

        let image = report.stored().next().unwrap();
        assert!(image.stored_filename.ends_with(".jpg"));
        assert_eq!(image.title, ".jpg");
    }

    #[test]
    fn thumbnail_failure_removes_original() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        let entry = stage_upload(tmp.path(), "a.jpg", |p| create_test_jpeg(p, 10, 10));
        let backend = MockBackend::failing_thumbnails();
        let mut catalog = MemoryCatalog::default();

        let report =
            ingest_with_backend(&backend, &batch_of(vec![entry]), OwnerId(1), &config, &mut catalog);

        assert!(matches!(
            report.outcomes[0].result,
            Err(FileError::Thumbnail { .. })
        ));
        assert_eq!(dir_len(&config.storage.originals_dir), 0);
        assert!(catalog.records.is_empty());
        assert!(matches!(
            backend.get_operations().as_slice(),
            [RecordedOp::Thumbnail { .. }]
        ));
    }

    #[test]
    fn missing_payload_is_store_error() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        let entry = RawUploadEntry::received("gone.jpg", tmp.path().join("gone.tmp"), 10);

        let report = ingest(
            &batch_of(vec![entry]),
            OwnerId(1),
            &config,
            &mut MemoryCatalog::default(),
        );
        assert!(matches!(
            report.outcomes[0].result,
            Err(FileError::StoreOriginal { .. })
        ));
    }

    #[test]
    fn persist_failure_leaves_files_in_place() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        let entry = stage_upload(tmp.path(), "a.png", |p| create_test_png(p, 12, 12));
        let mut catalog = MemoryCatalog::failing();

        let report = ingest(&batch_of(vec![entry]), OwnerId(1), &config, &mut catalog);

        assert!(matches!(
            report.outcomes[0].result,
            Err(FileError::Persist { .. })
        ));
        assert_eq!(dir_len(&config.storage.originals_dir), 1);
        assert_eq!(dir_len(&config.storage.thumbnails_dir), 1);
    }

    #[test]
    fn one_outcome_per_accepted_entry_in_order() {
        let tmp = TempDir::new().unwrap();
        let config = test_config(tmp.path());
        let entries = vec![
            stage_upload(tmp.path(), "one.jpg", |p| create_test_jpeg(p, 10, 10)),
            RawUploadEntry::empty_slot(),
            stage_upload(tmp.path(), "two.gif", |p| fs::write(p, b"not a gif").unwrap()),
            stage_upload(tmp.path(), "three.png", |p| create_test_png(p, 10, 10)),
        ];

        let report = ingest(
            &batch_of(entries),
            OwnerId(1),
            &config,
            &mut MemoryCatalog::default(),
        );

        let names: Vec<_> = report
            .outcomes
            .iter()
            .map(|o| o.original_filename.as_str())
            .collect();
        assert_eq!(names, vec!["one.jpg", "two.gif", "three.png"]);
        assert!(report.outcomes[0].is_success());
        assert!(!report.outcomes[1].is_success());
        assert!(report.outcomes[2].is_success());
        assert_eq!(dir_len(&config.storage.originals_dir), 2);
        assert_eq!(dir_len(&config.storage.thumbnails_dir), 2);
    }
}
