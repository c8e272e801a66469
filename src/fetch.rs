use std::path::PathBuf;
use std::process::Command;
use anyhow::{Context, Result};
use crate::cache;
use crate::config::Config;
use crate::error::GemstallError;
use crate::gem_env::GemEnv;
use crate::package::PackageId;

/// Downloads the archive for `id` into the cache by invoking the registry
/// client's fetch subcommand.
///
/// The client runs with the cache root as its working directory, so the
/// archive lands there under its canonical `<name>-<version>.gem` name, and
/// with its spec cache redirected into a subdirectory of the cache root.
///
/// # Errors
///
/// Returns [`GemstallError::Fetch`] when the subprocess exits non-zero; the
/// exit code is embedded in the message but not further interpreted.
pub fn fetch(id: &PackageId, config: &Config) -> Result<PathBuf> {
    std::fs::create_dir_all(&config.cache_root)
        .with_context(|| format!("Could not create cache dir {:?}", config.cache_root))?;

    println!("Fetching {} from gem source", id.name);
    let env = GemEnv::for_fetch(&config.cache_root);
    let mut cmd = Command::new(&config.gem_path);
    cmd.arg("fetch")
        .arg(&id.name)
        .arg("--version")
        .arg(&id.version)
        .current_dir(&config.cache_root);
    env.apply(&mut cmd);

    let status = cmd
        .status()
        .with_context(|| format!("Could not run {:?}", config.gem_path))?;
    if !status.success() {
        return Err(GemstallError::Fetch {
            name: id.name.clone(),
            status: status.code().unwrap_or(-1),
        }
        .into());
    }
    Ok(cache::locate(&config.cache_root, id))
}
