use anyhow::{Result, bail};
use crate::util::{format_hash, is_valid_version};

/// Identity of one installable gem: name, exact version, and an optional
/// expected archive checksum.
///
/// Immutable once built. The checksum is only used to verify the fetched
/// archive; it plays no part in path derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageId {
    pub name: String,
    pub version: String,
    pub sha256: Option<String>,
}

impl PackageId {
    pub fn new(name: &str, version: &str) -> PackageId {
        PackageId {
            name: name.to_string(),
            version: version.to_string(),
            sha256: None,
        }
    }

    /// Parses a `<name>@<version>` argument as given on the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if either part is missing or the version string is
    /// not a valid gem version.
    pub fn parse(name_at_version: &str) -> Result<PackageId> {
        let mut split = name_at_version.split('@');
        let name = split.next().unwrap_or_default();
        let version = split.next().unwrap_or_default();
        if name.is_empty() || version.is_empty() {
            bail!("Invalid package spec '{}': expected <name>@<version>", name_at_version);
        }
        if !is_valid_version(version) {
            bail!("Invalid version: {}", version);
        }
        Ok(PackageId::new(name, version))
    }

    /// Attaches an expected archive checksum, stripping any `sha256:` prefix.
    pub fn with_sha256(mut self, hash: &str) -> PackageId {
        self.sha256 = Some(format_hash(hash));
        self
    }

    /// The `<name>-<version>` stem used for cache entries, gem directories
    /// and specification files.
    pub fn full_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// File name of the cached archive: `<name>-<version>.gem`.
    pub fn archive_name(&self) -> String {
        format!("{}.gem", self.full_name())
    }
}
