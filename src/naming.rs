//! Stored filename generation and upload-name helpers.
//!
//! Stored files are named `<token>_<unix-timestamp>.<ext>`: a random
//! alphanumeric token, the second the file was ingested, and the original
//! extension lowercased. The same name is used in both storage trees.
//!
//! The token alone is not guaranteed unique, so generation checks each
//! candidate against storage and retries with a fresh token a bounded
//! number of times.
//!
//! ## Titles
//!
//! An image without a shared title is titled after its upload name with the
//! extension stripped: `Beach Day.JPG` → "Beach Day".

use rand::Rng;
use std::path::Path;
use thiserror::Error;

/// Characters a token is drawn from.
pub const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Default token length.
pub const TOKEN_LENGTH: usize = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("no unused stored filename after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

/// Draw a random token of `len` characters from [`ALPHABET`].
pub fn random_token<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Assemble `<token>_<timestamp>.<ext>`.
pub fn stored_filename(token: &str, timestamp: i64, ext: &str) -> String {
    format!("{token}_{timestamp}.{ext}")
}

/// Generate a stored filename that `is_taken` reports as free.
///
/// Tries up to `max_attempts` fresh tokens before giving up.
pub fn generate_unique_name<R, F>(
    rng: &mut R,
    token_len: usize,
    timestamp: i64,
    ext: &str,
    max_attempts: u32,
    is_taken: F,
) -> Result<String, NamingError>
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    for _ in 0..max_attempts {
        let candidate = stored_filename(&random_token(rng, token_len), timestamp, ext);
        if !is_taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(NamingError::Exhausted {
        attempts: max_attempts,
    })
}

/// Lowercased text after the last dot of an upload name, if any.
///
/// A bare dotfile name counts: `.jpg` has the extension `jpg`.
pub fn file_extension(name: &str) -> Option<String> {
    let base = Path::new(name).file_name()?.to_str()?;
    let (_, ext) = base.rsplit_once('.')?;
    (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
}

/// Upload name with its final extension stripped.
pub fn title_from_filename(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
