use std::path::{Path, PathBuf};
use anyhow::Result;
use regex::Regex;
use crate::error::GemstallError;
use crate::package::PackageId;

/// Metadata of an installed gem, read from the specification file the
/// registry client writes under `<prefix>/specifications/`.
///
/// Read-only and derived entirely from prefix contents; parsing itself does
/// no filesystem access, so it is testable against plain strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    pub name: String,
    pub version: String,
    /// Subdirectory of the gem's own tree that holds its executables.
    pub bindir: String,
    pub executables: Vec<String>,
}

/// Path of the specification file for a package identity.
pub fn gemspec_path(prefix: &Path, id: &PackageId) -> PathBuf {
    prefix
        .join("specifications")
        .join(format!("{}.gemspec", id.full_name()))
}

/// Loads and parses the manifest for an installed package.
///
/// # Errors
///
/// Returns [`GemstallError::Manifest`] when the specification file is
/// missing or does not carry the expected fields.
pub fn load(prefix: &Path, id: &PackageId) -> Result<Manifest> {
    let path = gemspec_path(prefix, id);
    let source = std::fs::read_to_string(&path).map_err(|e| GemstallError::Manifest {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    parse(&source, &path)
}

/// Parses the canonical specification format the registry client generates:
/// `s.<attr> = "<value>"` assignments inside a `Gem::Specification.new`
/// block. `bindir` defaults to `bin` and the executable list may be empty;
/// `name` and `version` are required.
pub fn parse(source: &str, path: &Path) -> Result<Manifest> {
    let name = capture_string(source, "name")?.ok_or_else(|| missing(path, "name"))?;
    let version = capture_string(source, "version")?.ok_or_else(|| missing(path, "version"))?;
    let bindir = capture_string(source, "bindir")?.unwrap_or_else(|| "bin".to_string());
    let executables = capture_string_list(source, "executables")?;
    Ok(Manifest {
        name,
        version,
        bindir,
        executables,
    })
}

fn capture_string(source: &str, attr: &str) -> Result<Option<String>> {
    let re = Regex::new(&format!(r#"s\.{}\s*=\s*"([^"]*)""#, regex::escape(attr)))?;
    Ok(re
        .captures(source)
        .map(|caps| caps[1].to_string()))
}

fn capture_string_list(source: &str, attr: &str) -> Result<Vec<String>> {
    let list_re = Regex::new(&format!(
        r#"s\.{}\s*=\s*\[([^\]]*)\]"#,
        regex::escape(attr)
    ))?;
    let inner = match list_re.captures(source) {
        Some(caps) => caps[1].to_string(),
        None => return Ok(Vec::new()),
    };
    let item_re = Regex::new(r#""([^"]*)""#)?;
    Ok(item_re
        .captures_iter(&inner)
        .map(|caps| caps[1].to_string())
        .collect())
}

fn missing(path: &Path, field: &str) -> GemstallError {
    GemstallError::Manifest {
        path: path.to_path_buf(),
        reason: format!("missing field '{}'", field),
    }
}
