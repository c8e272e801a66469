use std::path::{Path, PathBuf};
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use crate::package::PackageId;

/// Resolved tool configuration.
///
/// Every subprocess invocation receives the pieces it needs from here;
/// nothing reads the process environment at call time except `PATH` and
/// `HOME`, both of which are captured once by the installer.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interpreter pinned into wrapper-script shebang lines.
    pub ruby_path: PathBuf,
    /// The external registry client binary.
    pub gem_path: PathBuf,
    /// Directory holding one cached archive per package identity.
    pub cache_root: PathBuf,
    /// Directory holding one install prefix per package identity.
    pub prefix_root: PathBuf,
    pub bash_completion_dir: PathBuf,
    pub zsh_completion_dir: PathBuf,
    /// Canonical system bin directory that replaces an injected shim
    /// directory on `PATH` during installs.
    pub system_bin_dir: PathBuf,
    /// Shim directory injected by a host build environment, if any.
    pub shims_path: Option<PathBuf>,
}

/// On-disk `gemstall.toml`. Every field is optional; unset fields fall back
/// to the built-in defaults.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConfigFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ruby_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gem_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bash_completion_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zsh_completion_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_bin_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shims_path: Option<PathBuf>,
}

impl ConfigFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<ConfigFile> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Could not read config {:?}", path.as_ref()))?;
        toml::from_str(&content)
            .with_context(|| format!("Could not parse config {:?}", path.as_ref()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Config {
    /// Resolves the effective configuration.
    ///
    /// An explicit `--config` path must exist and parse. Otherwise the
    /// default location `<config_dir>/gemstall.toml` is used when present,
    /// and built-in defaults fill in everything left unset.
    pub fn resolve(explicit: Option<&Path>) -> Result<Config> {
        let file = match explicit {
            Some(path) => ConfigFile::load(path)?,
            None => {
                let default_path = default_config_path()?;
                if default_path.exists() {
                    ConfigFile::load(&default_path)?
                } else {
                    ConfigFile::default()
                }
            }
        };
        Config::from_file(file)
    }

    fn from_file(file: ConfigFile) -> Result<Config> {
        let (cache_dir, data_dir) = global_dirs()?;
        Ok(Config {
            ruby_path: file
                .ruby_path
                .unwrap_or_else(|| PathBuf::from("/usr/local/bin/ruby")),
            gem_path: file
                .gem_path
                .unwrap_or_else(|| PathBuf::from("/usr/local/bin/gem")),
            cache_root: file.cache_root.unwrap_or(cache_dir),
            prefix_root: file.prefix_root.unwrap_or_else(|| data_dir.join("prefixes")),
            bash_completion_dir: file
                .bash_completion_dir
                .unwrap_or_else(|| PathBuf::from("/usr/local/etc/bash_completion.d")),
            zsh_completion_dir: file
                .zsh_completion_dir
                .unwrap_or_else(|| PathBuf::from("/usr/local/share/zsh/site-functions")),
            system_bin_dir: file
                .system_bin_dir
                .unwrap_or_else(|| PathBuf::from("/usr/local/bin")),
            shims_path: file
                .shims_path
                .or_else(|| std::env::var_os("GEMSTALL_SHIMS_PATH").map(PathBuf::from)),
        })
    }

    /// Install prefix owned by one package identity.
    pub fn prefix_for(&self, id: &PackageId) -> PathBuf {
        self.prefix_root.join(&id.name).join(&id.version)
    }
}

fn default_config_path() -> Result<PathBuf> {
    let proj_dirs = project_dirs()?;
    Ok(proj_dirs.config_dir().join("gemstall.toml"))
}

fn global_dirs() -> Result<(PathBuf, PathBuf)> {
    let proj_dirs = project_dirs()?;
    Ok((
        proj_dirs.cache_dir().to_path_buf(),
        proj_dirs.data_dir().to_path_buf(),
    ))
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("org", "gemstall", "gemstall")
        .ok_or_else(|| anyhow!("Could not get project directories"))
}
