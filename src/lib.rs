//! # Gemstall Core Library
//!
//! This crate contains the core logic and building blocks of the `gemstall` tool – an installer
//! that puts RubyGems-distributed CLI tools into isolated prefix directories, wires them up with
//! generated wrapper scripts, and installs their shell completions.
//!
//! All heavy lifting (dependency resolution, building native extensions) is delegated to the
//! external `gem` registry client, invoked as a subprocess with an explicitly constructed,
//! isolated environment. What lives here is the glue: cache bookkeeping, subprocess invocation,
//! manifest parsing, wrapper rendering and completion discovery.
//!
//! This library is built for the `gemstall` CLI, but you can also reuse it as a backend in other tools.
//!
//! ## Modules Overview
//! - [`package`] – Package identity ( name, version, expected checksum )
//! - [`config`] – Tool configuration (`gemstall.toml`, default paths)
//! - [`cache`] – Archive cache: locate, exists, evict, verify
//! - [`fetch`] – Fetching archives through the registry client
//! - [`gem_env`] – Explicit subprocess environments and `PATH` shim rewriting
//! - [`installer`] – Installing a cached archive into an isolated prefix
//! - [`manifest`] – Parsing the installed gem's specification file
//! - [`wrappers`] – Generating launcher scripts for manifest executables
//! - [`completions`] – Discovering and installing shell completion files
//! - [`util`] – Shared utilities (version checks, hashing)

pub mod package;
pub mod config;
pub mod cache;
pub mod fetch;
pub mod gem_env;
pub mod installer;
pub mod manifest;
pub mod wrappers;
pub mod completions;
pub mod util;
pub mod error;

pub use package::*;
pub use error::*;
pub use gem_env::*;
pub use manifest::*;
pub use util::*;
