//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every stored or failed file leads with its positional index and the name
//! the user uploaded it under. Storage names, metadata and failure reasons
//! follow as indented context lines.
//!
//! # Output Format
//!
//! ## Ingest
//!
//! ```text
//! Uploaded
//! 001 Sunset
//!     Source: Sunset.PNG
//!     Stored: aB3dE5gH7j_1714564800.png
//!     dimensions: 40 x 20
//! Failed
//! 001 notes.txt
//!     Invalid format for 'notes.txt'. JPG, PNG, GIF only.
//!
//! 1 uploaded, 1 failed
//! ```
//!
//! A rejected batch lists only the batch errors:
//!
//! ```text
//! Batch rejected
//!     Max 20 images. You selected 21.
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure and do no I/O.

use crate::catalog::CatalogRecord;
use crate::imaging::Dimensions;
use crate::ingest::IngestReport;
use crate::metadata::ImageMetadata;
use crate::storage::RemovedFiles;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn metadata_lines(metadata: &ImageMetadata, depth: usize) -> Vec<String> {
    metadata
        .entries()
        .into_iter()
        .map(|(key, value)| format!("{}{}: {}", indent(depth), key, value))
        .collect()
}

// ============================================================================
// ingest
// ============================================================================

/// Format the outcome of one ingestion call.
pub fn format_ingest_report(report: &IngestReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.batch_errors.is_empty() {
        lines.push("Batch rejected".to_string());
        for error in &report.batch_errors {
            lines.push(format!("{}{}", indent(1), error));
        }
        return lines;
    }

    let stored: Vec<_> = report.stored().collect();
    let failed: Vec<_> = report.failures().collect();

    if !stored.is_empty() {
        lines.push("Uploaded".to_string());
        for (i, image) in stored.iter().enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), image.title));
            lines.push(format!("{}Source: {}", indent(1), image.original_filename));
            lines.push(format!("{}Stored: {}", indent(1), image.stored_filename));
            lines.extend(metadata_lines(&image.metadata, 1));
        }
    }

    if !failed.is_empty() {
        lines.push("Failed".to_string());
        let failed_names = report
            .outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| o.original_filename.as_str());
        for (i, (name, error)) in failed_names.zip(&failed).enumerate() {
            lines.push(format!("{} {}", format_index(i + 1), name));
            lines.push(format!("{}{}", indent(1), error));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{} uploaded, {} failed",
        stored.len(),
        failed.len()
    ));
    lines
}

pub fn print_ingest_report(report: &IngestReport) {
    for line in format_ingest_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// inspect
// ============================================================================

/// Format the metadata document extracted from one file.
pub fn format_metadata(path: &Path, metadata: &ImageMetadata) -> Vec<String> {
    let mut lines = vec![path.display().to_string()];
    if metadata.is_empty() {
        lines.push(format!("{}(no metadata)", indent(1)));
    } else {
        lines.extend(metadata_lines(metadata, 1));
    }
    lines
}

pub fn print_metadata(path: &Path, metadata: &ImageMetadata) {
    for line in format_metadata(path, metadata) {
        println!("{}", line);
    }
}

// ============================================================================
// thumbnail
// ============================================================================

pub fn format_thumbnail(source: &Path, target: &Path, dims: Dimensions) -> String {
    format!(
        "{} \u{2192} {} ({}x{})",
        source.display(),
        target.display(),
        dims.width,
        dims.height
    )
}

// ============================================================================
// remove
// ============================================================================

/// Format the result of removing a stored image.
pub fn format_removal(
    stored_filename: &str,
    removed: RemovedFiles,
    record: Option<&CatalogRecord>,
) -> Vec<String> {
    let status = |deleted: bool| if deleted { "deleted" } else { "not found" };
    let mut lines = vec![match record {
        Some(r) => format!("{} ({})", stored_filename, r.original_filename),
        None => stored_filename.to_string(),
    }];
    lines.push(format!("{}original: {}", indent(1), status(removed.original)));
    lines.push(format!("{}thumbnail: {}", indent(1), status(removed.thumbnail)));
    lines.push(format!(
        "{}catalog: {}",
        indent(1),
        match record {
            Some(r) => format!("record {} removed", r.id),
            None => "no record".to_string(),
        }
    ));
    lines
}

pub fn print_removal(stored_filename: &str, removed: RemovedFiles, record: Option<&CatalogRecord>) {
    for line in format_removal(stored_filename, removed, record) {
        println!("{}", line);
    }
}
