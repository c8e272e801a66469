use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::manifest::Manifest;

/// Generates one launcher script per manifest executable into the prefix's
/// user-facing `bin/` directory.
///
/// The directory is cleared and recreated first, so wrappers from a previous
/// run never survive. Scripts embed the prefix and the dependency load path
/// literally; they break at runtime, not at install time, if the prefix is
/// later removed.
pub fn generate(prefix: &Path, manifest: &Manifest, ruby_path: &Path) -> Result<Vec<PathBuf>> {
    let bin_dir = prefix.join("bin");
    if bin_dir.exists() {
        std::fs::remove_dir_all(&bin_dir)
            .with_context(|| format!("Could not clear wrapper dir {:?}", bin_dir))?;
    }
    std::fs::create_dir_all(&bin_dir)?;

    let lib_dirs = gem_lib_dirs(prefix)?;
    let gem_dir = prefix
        .join("gems")
        .join(format!("{}-{}", manifest.name, manifest.version));

    let mut written = Vec::new();
    for exe in &manifest.executables {
        let target = gem_dir.join(&manifest.bindir).join(exe);
        let wrapper = bin_dir.join(exe);
        std::fs::write(&wrapper, render(ruby_path, prefix, &lib_dirs, &target))
            .with_context(|| format!("Could not write wrapper {:?}", wrapper))?;
        make_executable(&wrapper)?;
        written.push(wrapper);
    }
    Ok(written)
}

/// Every dependency's library directory under the prefix, via the
/// `<prefix>/gems/*/lib` glob. Globbing lives only here; callers work from
/// the returned list. Sorted so wrapper output is deterministic.
pub fn gem_lib_dirs(prefix: &Path) -> Result<Vec<PathBuf>> {
    let gems_dir = prefix.join("gems");
    if !gems_dir.exists() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(&gems_dir)? {
        let entry = entry?;
        let lib = entry.path().join("lib");
        if entry.file_type()?.is_dir() && lib.is_dir() {
            dirs.push(lib);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Renders the wrapper script. The shape is fixed: a shebang pinning the
/// interpreter with native gem auto-loading disabled, the two isolation
/// variables, a load-path prepend listing every dependency lib directory as
/// a literal quoted string, and a load of the real executable.
pub fn render(ruby_path: &Path, prefix: &Path, lib_dirs: &[PathBuf], target: &Path) -> String {
    let load_path = lib_dirs
        .iter()
        .map(|dir| format!("\"{}\"", dir.display()))
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "#!{ruby} --disable-gems\n\
         ENV['GEM_HOME']=\"{prefix}\"\n\
         ENV['GEM_PATH']=\"{prefix}\"\n\
         require 'rubygems'\n\
         $:.unshift({load_path})\n\
         load \"{target}\"\n",
        ruby = ruby_path.display(),
        prefix = prefix.display(),
        load_path = load_path,
        target = target.display(),
    )
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
