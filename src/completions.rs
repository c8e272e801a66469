use std::path::{Path, PathBuf};
use anyhow::Result;
use regex::Regex;
use walkdir::WalkDir;
use crate::config::Config;

/// Completion files installed for a package, per shell dialect. A shell
/// without a discovered completion file is simply absent.
#[derive(Debug, Default, PartialEq)]
pub struct CompletionPaths {
    pub bash: Option<PathBuf>,
    pub zsh: Option<PathBuf>,
}

/// Searches the installed gem tree for bash and zsh completion files and
/// copies any found into the configured completion directories.
///
/// Each shell has an ordered pattern list; the first match wins and later
/// matches are ignored. Lookup and copying are best-effort: a shell with no
/// match is skipped, and I/O failures are treated as "no completion
/// available" rather than errors.
pub fn install(gem_dir: &Path, name: &str, config: &Config) -> CompletionPaths {
    let mut installed = CompletionPaths::default();
    if let Some(found) = find_first(gem_dir, &bash_patterns(name)) {
        installed.bash = copy_into(&found, &config.bash_completion_dir).ok();
    }
    if let Some(found) = find_first(gem_dir, &zsh_patterns(name)) {
        installed.zsh = copy_into(&found, &config.zsh_completion_dir).ok();
    }
    installed
}

/// Ordered patterns for bash, most specific first: a `completion/` or
/// `completions/` directory at the top of the gem tree, then a
/// `<name>_completion` / `<name>-completion` file anywhere.
fn bash_patterns(name: &str) -> Vec<String> {
    let name = regex::escape(name);
    vec![
        format!(r"^completions?/{name}\.(bash|sh)$"),
        format!(r"(^|/){name}[_-]completions?\.(bash|sh)$"),
    ]
}

/// Ordered patterns for zsh. Unlike bash, only the plural `completions/`
/// directory is recognized in the specific form.
fn zsh_patterns(name: &str) -> Vec<String> {
    let name = regex::escape(name);
    vec![
        format!(r"^completions/{name}\.zsh$"),
        format!(r"(^|/){name}[_-]completions?\.zsh$"),
    ]
}

/// First file under `gem_dir` whose relative path matches a pattern.
/// Patterns are tried in order; within one pattern the walk is sorted by
/// file name so the result is deterministic.
fn find_first(gem_dir: &Path, patterns: &[String]) -> Option<PathBuf> {
    for pattern in patterns {
        let re = match Regex::new(pattern) {
            Ok(re) => re,
            Err(_) => continue,
        };
        let walk = WalkDir::new(gem_dir).sort_by_file_name();
        for entry in walk.into_iter().filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = match entry.path().strip_prefix(gem_dir) {
                Ok(rel) => rel,
                Err(_) => continue,
            };
            let rel = rel.to_string_lossy().replace('\\', "/");
            if re.is_match(&rel) {
                return Some(entry.path().to_path_buf());
            }
        }
    }
    None
}

fn copy_into(file: &Path, dest_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dest_dir)?;
    let file_name = file
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Completion file has no name"))?;
    let dest = dest_dir.join(file_name);
    std::fs::copy(file, &dest)?;
    Ok(dest)
}
