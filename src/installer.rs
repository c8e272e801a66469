use std::path::Path;
use std::process::Command;
use anyhow::{Context, Result};
use crate::config::Config;
use crate::error::GemstallError;
use crate::gem_env::{GemEnv, rewrite_search_path};
use crate::package::PackageId;

/// Installs a cached archive into the isolated prefix by invoking the
/// registry client's install subcommand.
///
/// The subprocess sees the prefix as its sole package home and package path,
/// so nothing installed elsewhere on the host leaks into the build.
/// Documentation generation and the client's own wrapper scripts are
/// disabled; wrapper generation is handled separately after install.
///
/// # Errors
///
/// Returns [`GemstallError::MissingArchive`] when the cache entry is absent
/// and [`GemstallError::Install`] when the subprocess exits non-zero. A
/// failed install aborts the whole operation; no partial-install cleanup is
/// attempted here.
pub fn install(id: &PackageId, archive: &Path, prefix: &Path, config: &Config) -> Result<()> {
    if !archive.exists() {
        return Err(GemstallError::MissingArchive(archive.to_path_buf()).into());
    }
    std::fs::create_dir_all(prefix)
        .with_context(|| format!("Could not create prefix {:?}", prefix))?;

    let home = std::env::var_os("HOME").map(std::path::PathBuf::from);
    preserve_gemrc(home.as_deref(), prefix)?;

    let host_path = std::env::var("PATH").unwrap_or_default();
    let search_path =
        rewrite_search_path(&host_path, config.shims_path.as_deref(), &config.system_bin_dir);
    let env = GemEnv::for_install(prefix, search_path);

    let mut cmd = Command::new(&config.gem_path);
    cmd.arg("install")
        .arg(archive)
        .arg("--no-document")
        .arg("--no-wrapper")
        .arg("--no-user-install")
        .arg("--install-dir")
        .arg(prefix)
        .arg("--bindir")
        .arg(prefix.join("bin"));
    env.apply(&mut cmd);

    let status = cmd
        .status()
        .with_context(|| format!("Could not run {:?}", config.gem_path))?;
    if !status.success() {
        return Err(GemstallError::Install {
            name: id.name.clone(),
            status: status.code().unwrap_or(-1),
        }
        .into());
    }
    Ok(())
}

/// Copies the invoking user's `.gemrc` into the build home so the client
/// keeps its configuration during the isolated install. One-time and
/// idempotent: an existing copy is never overwritten.
pub fn preserve_gemrc(home: Option<&Path>, build_home: &Path) -> Result<()> {
    let home = match home {
        Some(home) => home,
        None => return Ok(()),
    };
    let user_gemrc = home.join(".gemrc");
    let build_gemrc = build_home.join(".gemrc");
    if user_gemrc.exists() && !build_gemrc.exists() {
        std::fs::copy(&user_gemrc, &build_gemrc)
            .with_context(|| format!("Could not copy {:?} to {:?}", user_gemrc, build_gemrc))?;
    }
    Ok(())
}
