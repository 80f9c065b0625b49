//! # Snapshelf
//!
//! The ingestion core of a photo catalog: takes one batch of uploaded files,
//! screens it, stores each image with a thumbnail, and derives a metadata
//! document (dimensions, camera, exposure, GPS, file size) for the catalog.
//!
//! # Pipeline
//!
//! ```text
//! UploadBatch ─▶ validate ─▶ per file: name ─▶ store ─▶ thumbnail ─▶ metadata ─▶ Catalog
//!                  │                                       │
//!                  └─ batch rejected, nothing written      └─ failure removes the original
//! ```
//!
//! Files are processed strictly one after another. Each produces its own
//! outcome; a failed file never stops the rest of the batch.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`ingest`] | Orchestrator, [`ingest::Catalog`] persistence trait, per-file outcomes |
//! | [`validate`] | Batch screening: transport errors, file count, total size |
//! | [`imaging`] | Pure-Rust image operations: identify, EXIF tags, bounding-box thumbnails |
//! | [`metadata`] | Typed metadata document and its best-effort extraction |
//! | [`rational`] | Lenient `"n/d"` fraction decoding for EXIF values |
//! | [`gps`] | Degrees/minutes/seconds to signed decimal degrees |
//! | [`size`] | Human-readable byte sizes |
//! | [`naming`] | Stored filename generation, extension and title helpers |
//! | [`storage`] | Parallel originals/thumbnails directory trees |
//! | [`catalog`] | JSON-file [`ingest::Catalog`] used by the CLI |
//! | [`config`] | `snapshelf.toml` loading, merging, validation |
//! | [`types`] | Upload entries, batches, stored images |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Typed Metadata
//!
//! The metadata document has a fixed set of nine keys. It is a struct of
//! optional fields rather than a string map, so the extractor's coverage is
//! visible at compile time and absent keys simply don't serialize.
//!
//! ## Best-Effort Extraction
//!
//! Each metadata field is resolved on its own from a priority list of
//! sources (embedded tags, then the raster header, then the filesystem).
//! Unreadable tags are logged at `debug` and skipped; extraction never fails
//! a file.
//!
//! ## No Orphans
//!
//! A stored original without a thumbnail is never left behind: a thumbnail
//! failure deletes the original before the file is reported as failed.
//!
//! ## Collision-Checked Names
//!
//! Stored names combine a random token with a one-second timestamp. Each
//! candidate is checked against both storage trees and regenerated on a
//! clash, up to a configured number of attempts.

pub mod catalog;
pub mod config;
pub mod gps;
pub mod imaging;
pub mod ingest;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod rational;
pub mod size;
pub mod storage;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
