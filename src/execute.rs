use anyhow::Result;
use gemstall::cache;
use gemstall::completions;
use gemstall::config::Config;
use gemstall::fetch::fetch;
use gemstall::installer::install;
use gemstall::manifest;
use gemstall::package::PackageId;
use gemstall::wrappers;
use crate::cli::{CLI, GemstallCommand};

pub fn execute(cli: CLI) -> Result<()> {
    let config = Config::resolve(cli.config.as_deref())?;
    match cli.command {
        GemstallCommand::Install {
            name_at_version,
            sha256,
        } => execute_install(&config, &name_at_version, sha256.as_deref()),
        GemstallCommand::Fetch { name_at_version } => {
            let id = PackageId::parse(&name_at_version)?;
            let archive = fetch(&id, &config)?;
            println!("Cached at: {}", archive.display());
            Ok(())
        }
        GemstallCommand::Evict { name_at_version } => {
            let id = PackageId::parse(&name_at_version)?;
            cache::evict(&config.cache_root, &id)
        }
        GemstallCommand::Uninstall { name_at_version } => {
            execute_uninstall(&config, &name_at_version)
        }
        GemstallCommand::Which { name } => execute_which(&config, &name),
        GemstallCommand::List => execute_list(&config),
    }
}

fn execute_install(config: &Config, name_at_version: &str, sha256: Option<&str>) -> Result<()> {
    let mut id = PackageId::parse(name_at_version)?;
    if let Some(hash) = sha256 {
        id = id.with_sha256(hash);
    }

    let archive = if cache::exists(&config.cache_root, &id) {
        cache::locate(&config.cache_root, &id)
    } else {
        fetch(&id, config)?
    };
    cache::verify(&archive, &id)?;

    let prefix = config.prefix_for(&id);
    install(&id, &archive, &prefix, config)?;

    let manifest = manifest::load(&prefix, &id)?;
    let written = wrappers::generate(&prefix, &manifest, &config.ruby_path)?;
    for wrapper in &written {
        println!("Wrapper: {}", wrapper.display());
    }

    let gem_dir = prefix.join("gems").join(id.full_name());
    let installed = completions::install(&gem_dir, &id.name, config);
    if let Some(bash) = &installed.bash {
        println!("Bash completion: {}", bash.display());
    }
    if let Some(zsh) = &installed.zsh {
        println!("Zsh completion: {}", zsh.display());
    }

    println!("Installed {} {}", id.name, id.version);
    Ok(())
}

fn execute_uninstall(config: &Config, name_at_version: &str) -> Result<()> {
    let id = PackageId::parse(name_at_version)?;
    let prefix = config.prefix_for(&id);
    if prefix.exists() {
        std::fs::remove_dir_all(&prefix)?;
        println!("Uninstalled {} {}", id.name, id.version);
    } else {
        println!("{} {} is not installed", id.name, id.version);
    }
    // Drop the now-empty per-name directory.
    let name_dir = config.prefix_root.join(&id.name);
    if name_dir.exists() && name_dir.read_dir()?.next().is_none() {
        std::fs::remove_dir(&name_dir)?;
    }
    Ok(())
}

fn execute_which(config: &Config, name: &str) -> Result<()> {
    let mut found = false;
    for version in installed_versions(config, name)? {
        let bin_dir = config.prefix_root.join(name).join(&version).join("bin");
        if !bin_dir.exists() {
            continue;
        }
        let mut entries: Vec<_> = bin_dir
            .read_dir()?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect();
        entries.sort();
        for wrapper in entries {
            println!("{}", wrapper.display());
            found = true;
        }
    }
    if !found {
        println!("No wrappers found for {}", name);
    }
    Ok(())
}

fn execute_list(config: &Config) -> Result<()> {
    let mut listed = false;
    if config.prefix_root.exists() {
        let mut names: Vec<_> = config
            .prefix_root
            .read_dir()?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        for name in names {
            for version in installed_versions(config, &name)? {
                println!("{}@{}", name, version);
                listed = true;
            }
        }
    }
    if !listed {
        println!("No gems installed");
    }
    Ok(())
}

fn installed_versions(config: &Config, name: &str) -> Result<Vec<String>> {
    let name_dir = config.prefix_root.join(name);
    if !name_dir.exists() {
        return Ok(Vec::new());
    }
    let mut versions: Vec<_> = name_dir
        .read_dir()?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    versions.sort();
    Ok(versions)
}
