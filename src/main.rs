use clap::{Parser, Subcommand};
use snapshelf::catalog::JsonCatalog;
use snapshelf::imaging::{self, RustBackend, ThumbnailConfig};
use snapshelf::storage::StorageLayout;
use snapshelf::types::{OwnerId, RawUploadEntry, UploadBatch};
use snapshelf::validate::TransportError;
use snapshelf::{config, ingest, metadata, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "snapshelf")]
#[command(about = "Ingest photos into a catalog: validate, store, thumbnail, extract metadata")]
#[command(long_about = "\
Ingest photos into a catalog: validate, store, thumbnail, extract metadata

Every `ingest` call is one upload batch. The batch is checked as a whole
(file count, total size); then each JPEG, PNG or GIF is stored under a
generated name, thumbnailed, and described by its EXIF and raster metadata.

Storage layout (configurable):

  uploads/
  ├── images/         # Full-resolution originals
  ├── thumbnails/     # Same filenames, fitted into the thumbnail box
  └── catalog.json    # One record per stored image

Stored filenames: <random-token>_<unix-timestamp>.<ext>

Metadata keys (each present only when derivable):
  dimensions, filesize, mimetype, camera, date_taken,
  exposure, iso, aperture, location

Set RUST_LOG=info to log every stored file.
Run 'snapshelf gen-config' to generate a documented snapshelf.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file (stock defaults when absent)
    #[arg(long, default_value = "snapshelf.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest files and directories as one upload batch
    Ingest(IngestArgs),
    /// Print the metadata extracted from an image
    Inspect {
        /// Image file
        path: PathBuf,
    },
    /// Write a single thumbnail, in the source's format
    Thumbnail {
        source: PathBuf,
        target: PathBuf,
        /// Bounding box width (default from config)
        #[arg(long)]
        max_width: Option<u32>,
        /// Bounding box height (default from config)
        #[arg(long)]
        max_height: Option<u32>,
    },
    /// Delete a stored image's files and catalog record
    Remove {
        /// Generated name, as shown by `ingest`
        stored_filename: String,
    },
    /// Print a stock snapshelf.toml with all options documented
    GenConfig,
}

#[derive(clap::Args)]
struct IngestArgs {
    /// Owner recorded with every image
    #[arg(long)]
    owner: i64,
    /// Shared title (each file falls back to its own name)
    #[arg(long, default_value = "")]
    title: String,
    /// Shared description
    #[arg(long, default_value = "")]
    description: String,
    /// Shared tags
    #[arg(long, default_value = "")]
    tags: String,
    /// Image files or directories (walked recursively)
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Ingest(args) => {
            let config = config::load_config(&cli.config)?;
            let staging = tempfile::tempdir()?;
            let batch = UploadBatch {
                entries: stage_inputs(&args.paths, staging.path())?,
                shared_title: args.title,
                shared_description: args.description,
                shared_tags: args.tags,
            };
            let mut catalog = JsonCatalog::open(&config.storage.catalog_file)?;
            let report = ingest::ingest(&batch, OwnerId(args.owner), &config, &mut catalog);
            output::print_ingest_report(&report);

            let failed = report.has_failures();
            drop(staging);
            if failed {
                std::process::exit(1);
            }
        }
        Command::Inspect { path } => {
            if !path.is_file() {
                return Err(format!("{}: not a file", path.display()).into());
            }
            let meta = metadata::extract_metadata(&RustBackend::new(), &path);
            output::print_metadata(&path, &meta);
        }
        Command::Thumbnail {
            source,
            target,
            max_width,
            max_height,
        } => {
            let defaults = config::load_config(&cli.config)?.thumbnail_config();
            let thumb = ThumbnailConfig {
                max_width: max_width.unwrap_or(defaults.max_width),
                max_height: max_height.unwrap_or(defaults.max_height),
                ..defaults
            };
            let dims = imaging::create_thumbnail(&RustBackend::new(), &source, &target, &thumb)?;
            println!("{}", output::format_thumbnail(&source, &target, dims));
        }
        Command::Remove { stored_filename } => {
            let config = config::load_config(&cli.config)?;
            let removed = StorageLayout::from_config(&config.storage).remove(&stored_filename)?;
            let mut catalog = JsonCatalog::open(&config.storage.catalog_file)?;
            let record = catalog.remove(&stored_filename)?;
            output::print_removal(&stored_filename, removed, record.as_ref());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Copy every input file into `staging`, one upload slot each.
///
/// Directories are walked recursively in name order. A file that can't be
/// copied becomes a slot with a write-failure transport error, so it shows
/// up in the batch verdict like any other transport failure.
fn stage_inputs(
    paths: &[PathBuf],
    staging: &Path,
) -> Result<Vec<RawUploadEntry>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(path.clone());
        }
    }

    let entries = files
        .iter()
        .enumerate()
        .map(|(slot, file)| {
            let original_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let declared_mime = image::ImageFormat::from_path(file)
                .map(|f| f.to_mime_type().to_string())
                .unwrap_or_default();
            let temp_path = staging.join(format!("upload-{slot:03}"));
            match std::fs::copy(file, &temp_path) {
                Ok(byte_size) => RawUploadEntry {
                    original_name,
                    declared_mime,
                    temp_path,
                    byte_size,
                    transport_error: None,
                },
                Err(e) => {
                    tracing::warn!(path = %file.display(), error = %e, "could not stage input");
                    RawUploadEntry {
                        original_name,
                        declared_mime,
                        temp_path,
                        byte_size: 0,
                        transport_error: Some(TransportError::CantWrite),
                    }
                }
            }
        })
        .collect();
    Ok(entries)
}
