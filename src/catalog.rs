//! JSON file catalog.
//!
//! A [`Catalog`] implementation that keeps every ingested image as a record in
//! a single pretty-printed JSON document:
//!
//! ```json
//! {
//!   "next_id": 3,
//!   "images": [
//!     {
//!       "id": 1,
//!       "owner": 7,
//!       "stored_filename": "aB3dE5gH7j_1714564800.jpg",
//!       "original_filename": "Beach.jpg",
//!       "title": "Beach",
//!       "description": "",
//!       "tags": "",
//!       "metadata": { "dimensions": "4000 x 3000", "iso": "ISO 400" },
//!       "created_at": "2024-05-01T12:00:00Z"
//!     }
//!   ]
//! }
//! ```
//!
//! Every change rewrites the whole file through a temporary sibling that is
//! renamed into place, so a crash never leaves a half-written catalog.

use crate::ingest::{Catalog, PersistError};
use crate::metadata::ImageMetadata;
use crate::types::{OwnerId, StoredImage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CatalogError> for PersistError {
    fn from(e: CatalogError) -> Self {
        PersistError::new(e.to_string())
    }
}

/// One cataloged image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: u64,
    pub owner: OwnerId,
    pub stored_filename: String,
    pub original_filename: String,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub metadata: ImageMetadata,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogDocument {
    next_id: u64,
    images: Vec<CatalogRecord>,
}

/// Catalog backed by a JSON file.
#[derive(Debug)]
pub struct JsonCatalog {
    path: PathBuf,
    doc: CatalogDocument,
}

impl JsonCatalog {
    /// Open the catalog at `path`. A missing file is an empty catalog.
    pub fn open(path: &Path) -> Result<Self, CatalogError> {
        let doc = if path.exists() {
            serde_json::from_str(&fs::read_to_string(path)?)?
        } else {
            CatalogDocument::default()
        };
        Ok(Self {
            path: path.to_path_buf(),
            doc,
        })
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.doc.images
    }

    pub fn find(&self, stored_filename: &str) -> Option<&CatalogRecord> {
        self.doc
            .images
            .iter()
            .find(|r| r.stored_filename == stored_filename)
    }

    /// Drop the record for a stored file. Returns the removed record, if any.
    pub fn remove(&mut self, stored_filename: &str) -> Result<Option<CatalogRecord>, CatalogError> {
        let Some(pos) = self
            .doc
            .images
            .iter()
            .position(|r| r.stored_filename == stored_filename)
        else {
            return Ok(None);
        };
        let record = self.doc.images.remove(pos);
        if let Err(e) = self.flush() {
            self.doc.images.insert(pos, record);
            return Err(e);
        }
        Ok(Some(record))
    }

    fn flush(&self) -> Result<(), CatalogError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &self.doc)?;
        tmp.write_all(b"\n")?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Catalog for JsonCatalog {
    fn save(&mut self, owner: OwnerId, image: &StoredImage) -> Result<(), PersistError> {
        let id = self.doc.next_id.max(1);
        self.doc.images.push(CatalogRecord {
            id,
            owner,
            stored_filename: image.stored_filename.clone(),
            original_filename: image.original_filename.clone(),
            title: image.title.clone(),
            description: image.description.clone(),
            tags: image.tags.clone(),
            metadata: image.metadata.clone(),
            created_at: Utc::now(),
        });
        let previous_next = self.doc.next_id;
        self.doc.next_id = id + 1;

        if let Err(e) = self.flush() {
            self.doc.images.pop();
            self.doc.next_id = previous_next;
            return Err(e.into());
        }
        Ok(())
    }
}
