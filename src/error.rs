use std::path::PathBuf;
use thiserror::Error;

/// Error taxonomy for the install pipeline.
///
/// Subprocess failures carry the exit status of the external `gem` client;
/// the status is embedded in the message but not otherwise interpreted.
/// Completion lookup is best-effort and has no error variant.
#[derive(Debug, Error)]
pub enum GemstallError {
    #[error("gem fetch '{name}' failed with status {status}")]
    Fetch { name: String, status: i32 },
    #[error("gem install '{name}' failed with status {status}")]
    Install { name: String, status: i32 },
    #[error("manifest {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },
    #[error("archive not found in cache: {0}")]
    MissingArchive(PathBuf),
    #[error("checksum mismatch for '{name}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        name: String,
        expected: String,
        actual: String,
    },
}
