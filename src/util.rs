use anyhow::Result;
use semver::Version;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Strips the `sha256:` prefix from a hash if present.
/// This is useful for formatting hashes uniformly.
pub fn format_hash(hash: &str) -> String {
    if let Some(hash) = hash.strip_prefix("sha256:") {
        hash.to_string()
    } else {
        hash.to_string()
    }
}

/// Validates a gem version string.
///
/// Full semver versions are accepted directly; gem versions with fewer or
/// more segments (e.g. `13.2`, `1.2.3.4`) are accepted when every segment is
/// a number or an alphanumeric prerelease marker.
pub fn is_valid_version(version: &str) -> bool {
    if Version::parse(version).is_ok() {
        return true;
    }
    !version.is_empty()
        && version
            .split('.')
            .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Hex-encoded SHA-256 of a byte slice.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Hex-encoded SHA-256 of a file's contents.
pub fn sha256_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(sha256_hex(&bytes))
}
