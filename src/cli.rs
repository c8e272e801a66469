use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CLI {
    /// Path to a `gemstall.toml` overriding the default configuration
    #[clap(long, global = true)]
    pub(crate) config: Option<PathBuf>,
    #[command(subcommand)]
    pub(crate) command: GemstallCommand,
}

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum GemstallCommand {
    /// Fetch a gem, install it into an isolated prefix, and generate wrapper
    /// scripts and shell completions
    Install {
        /// Name and version of the gem: <name>@<version>
        name_at_version: String,
        /// Expected SHA-256 of the fetched archive (hex, `sha256:` prefix allowed)
        #[clap(long)]
        sha256: Option<String>,
    },
    /// Download a gem archive into the cache without installing it
    Fetch {
        /// Name and version of the gem: <name>@<version>
        name_at_version: String,
    },
    /// Remove a cached archive. Succeeds even if the entry does not exist
    Evict {
        /// Name and version of the gem: <name>@<version>
        name_at_version: String,
    },
    /// Remove an installed prefix and the wrappers inside it
    Uninstall {
        /// Name and version of the gem: <name>@<version>
        name_at_version: String,
    },
    /// Print the wrapper paths of an installed gem
    Which {
        name: String,
    },
    /// List installed gems
    List,
}
