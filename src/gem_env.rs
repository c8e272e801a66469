use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment handed to one `gem` subprocess invocation.
///
/// The process environment is never mutated; isolation variables are built
/// here explicitly and applied to the `Command` just before spawning, so
/// there is no hidden coupling between calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GemEnv {
    /// `GEM_HOME`: sole package home for the subprocess.
    pub gem_home: Option<PathBuf>,
    /// `GEM_PATH`: sole package search path for the subprocess.
    pub gem_path: Option<PathBuf>,
    /// `GEM_SPEC_CACHE`: where the client keeps fetched spec metadata.
    pub gem_spec_cache: Option<PathBuf>,
    /// `HOME` for the subprocess, pointed at the build home so a preserved
    /// `.gemrc` is picked up.
    pub home: Option<PathBuf>,
    /// Replacement `PATH`, already rewritten for shim avoidance.
    pub search_path: Option<String>,
}

impl GemEnv {
    /// Environment for `gem fetch`: only the spec cache is redirected, into
    /// a subdirectory of the cache root so repeated runs cannot corrupt each
    /// other's metadata.
    pub fn for_fetch(cache_root: &Path) -> GemEnv {
        GemEnv {
            gem_spec_cache: Some(cache_root.join("gem_spec_cache")),
            ..GemEnv::default()
        }
    }

    /// Environment for `gem install`: the prefix becomes the sole package
    /// home and package path, so nothing installed elsewhere on the host
    /// leaks into the build.
    pub fn for_install(prefix: &Path, search_path: String) -> GemEnv {
        GemEnv {
            gem_home: Some(prefix.to_path_buf()),
            gem_path: Some(prefix.to_path_buf()),
            home: Some(prefix.to_path_buf()),
            search_path: Some(search_path),
            ..GemEnv::default()
        }
    }

    pub fn apply(&self, cmd: &mut Command) {
        if let Some(gem_home) = &self.gem_home {
            cmd.env("GEM_HOME", gem_home);
        }
        if let Some(gem_path) = &self.gem_path {
            cmd.env("GEM_PATH", gem_path);
        }
        if let Some(spec_cache) = &self.gem_spec_cache {
            cmd.env("GEM_SPEC_CACHE", spec_cache);
        }
        if let Some(home) = &self.home {
            cmd.env("HOME", home);
        }
        if let Some(path) = &self.search_path {
            cmd.env("PATH", path);
        }
    }
}

/// Rewrites a `PATH` value so the canonical system bin directory takes the
/// place of an injected shim directory.
///
/// Shim directories front-run the compiler configuration Ruby needs when
/// building native extensions. Only the first occurrence is replaced; when
/// no shim directory is configured or present, the value passes through
/// unchanged.
pub fn rewrite_search_path(path: &str, shims: Option<&Path>, system_bin: &Path) -> String {
    match shims {
        Some(shims) => path.replacen(
            &shims.to_string_lossy().to_string(),
            &system_bin.to_string_lossy(),
            1,
        ),
        None => path.to_string(),
    }
}
