use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::error::GemstallError;
use crate::package::PackageId;
use crate::util::sha256_file;

/// Path of the cache entry for a package identity.
///
/// Pure function of the identity and cache root; never touches the disk.
pub fn locate(cache_root: &Path, id: &PackageId) -> PathBuf {
    cache_root.join(id.archive_name())
}

pub fn exists(cache_root: &Path, id: &PackageId) -> bool {
    locate(cache_root, id).exists()
}

/// Removes the cache entry if present. Evicting a missing entry is a no-op.
pub fn evict(cache_root: &Path, id: &PackageId) -> Result<()> {
    let path = locate(cache_root, id);
    if path.exists() {
        std::fs::remove_file(&path)
            .with_context(|| format!("Could not remove cache entry {:?}", path))?;
    }
    Ok(())
}

/// Verifies the cached archive against the identity's expected checksum.
///
/// Identities without a checksum pass trivially. A mismatch is fatal; the
/// entry is left in place for inspection.
pub fn verify(archive: &Path, id: &PackageId) -> Result<()> {
    let expected = match &id.sha256 {
        Some(expected) => expected,
        None => return Ok(()),
    };
    let actual = sha256_file(archive)?;
    if &actual != expected {
        return Err(GemstallError::ChecksumMismatch {
            name: id.name.clone(),
            expected: expected.clone(),
            actual,
        }
        .into());
    }
    Ok(())
}
