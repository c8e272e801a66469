#![cfg(unix)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Writes a stand-in for the `gem` client that mimics `fetch` and `install`
/// well enough to exercise the whole pipeline without touching a registry.
fn write_stub_gem(dir: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let script = r#"#!/bin/sh
set -e
cmd="$1"; shift
if [ "$cmd" = "fetch" ]; then
  name="$1"; version="$3"
  printf 'gem-archive' > "$name-$version.gem"
  exit 0
fi
if [ "$cmd" = "install" ]; then
  prefix=""
  prev=""
  for arg in "$@"; do
    if [ "$prev" = "--install-dir" ]; then prefix="$arg"; fi
    prev="$arg"
  done
  test -n "$prefix"
  test "$GEM_HOME" = "$prefix"
  test "$GEM_PATH" = "$prefix"
  mkdir -p "$prefix/specifications" \
           "$prefix/gems/sleet-0.4.0/exe" \
           "$prefix/gems/sleet-0.4.0/lib" \
           "$prefix/gems/sleet-0.4.0/completions" \
           "$prefix/gems/thor-1.3.0/lib"
  cat > "$prefix/specifications/sleet-0.4.0.gemspec" <<'EOF'
Gem::Specification.new do |s|
  s.name = "sleet".freeze
  s.version = "0.4.0"
  s.bindir = "exe".freeze
  s.executables = ["sleet".freeze]
end
EOF
  printf '#!/usr/bin/env ruby\n' > "$prefix/gems/sleet-0.4.0/exe/sleet"
  printf '#compdef sleet\n' > "$prefix/gems/sleet-0.4.0/completions/sleet.zsh"
  exit 0
fi
exit 1
"#;
    let gem = dir.join("gem");
    fs::write(&gem, script).unwrap();
    let mut perms = fs::metadata(&gem).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&gem, perms).unwrap();
    gem
}

fn write_config(dir: &Path, gem: &Path) -> std::path::PathBuf {
    let config = format!(
        "gem_path = \"{gem}\"\n\
         ruby_path = \"/usr/local/bin/ruby\"\n\
         cache_root = \"{root}/cache\"\n\
         prefix_root = \"{root}/prefixes\"\n\
         bash_completion_dir = \"{root}/bash_completion\"\n\
         zsh_completion_dir = \"{root}/zsh_completion\"\n",
        gem = gem.display(),
        root = dir.display(),
    );
    let path = dir.join("gemstall.toml");
    fs::write(&path, config).unwrap();
    path
}

#[test]
fn test_install_generates_wrappers_and_completions() {
    let dir = tempdir().unwrap();
    let gem = write_stub_gem(dir.path());
    let config = write_config(dir.path(), &gem);

    Command::cargo_bin("gemstall")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "install", "sleet@0.4.0"])
        .assert()
        .success();

    // Archive cached under its canonical name.
    assert!(dir.path().join("cache/sleet-0.4.0.gem").exists());

    // Wrapper embeds the prefix and both dependency lib dirs.
    let prefix = dir.path().join("prefixes/sleet/0.4.0");
    let wrapper = fs::read_to_string(prefix.join("bin/sleet")).unwrap();
    assert!(wrapper.starts_with("#!/usr/local/bin/ruby --disable-gems\n"));
    assert!(wrapper.contains(&format!("ENV['GEM_HOME']=\"{}\"", prefix.display())));
    assert!(wrapper.contains(&format!("{}/gems/sleet-0.4.0/lib", prefix.display())));
    assert!(wrapper.contains(&format!("{}/gems/thor-1.3.0/lib", prefix.display())));
    assert!(wrapper.ends_with(&format!(
        "load \"{}/gems/sleet-0.4.0/exe/sleet\"\n",
        prefix.display()
    )));

    // Only a zsh completion exists in the stub tree.
    assert!(dir.path().join("zsh_completion/sleet.zsh").exists());
    assert!(!dir.path().join("bash_completion").exists());
}

#[test]
fn test_install_is_rerunnable() {
    let dir = tempdir().unwrap();
    let gem = write_stub_gem(dir.path());
    let config = write_config(dir.path(), &gem);

    for _ in 0..2 {
        Command::cargo_bin("gemstall")
            .unwrap()
            .args(["--config", config.to_str().unwrap(), "install", "sleet@0.4.0"])
            .assert()
            .success();
    }

    let prefix = dir.path().join("prefixes/sleet/0.4.0");
    assert!(prefix.join("bin/sleet").exists());
}

#[test]
fn test_install_rejects_checksum_mismatch() {
    let dir = tempdir().unwrap();
    let gem = write_stub_gem(dir.path());
    let config = write_config(dir.path(), &gem);

    let output = Command::cargo_bin("gemstall")
        .unwrap()
        .args([
            "--config",
            config.to_str().unwrap(),
            "install",
            "sleet@0.4.0",
            "--sha256",
            &"0".repeat(64),
        ])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&output);
    assert!(stderr.contains("checksum mismatch for 'sleet'"));
}

#[test]
fn test_failing_install_surfaces_exit_status() {
    let dir = tempdir().unwrap();
    use std::os::unix::fs::PermissionsExt;
    // Stub that fetches fine but fails every install with status 1.
    let script = "#!/bin/sh\nif [ \"$1\" = \"fetch\" ]; then : > \"$2-$4.gem\"; exit 0; fi\nexit 1\n";
    let gem = dir.path().join("gem");
    fs::write(&gem, script).unwrap();
    let mut perms = fs::metadata(&gem).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&gem, perms).unwrap();
    let config = write_config(dir.path(), &gem);

    let output = Command::cargo_bin("gemstall")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "install", "sleet@0.4.0"])
        .assert()
        .failure()
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&output);
    assert!(stderr.contains("gem install 'sleet' failed with status 1"));
}

#[test]
fn test_fetch_populates_cache_only() {
    let dir = tempdir().unwrap();
    let gem = write_stub_gem(dir.path());
    let config = write_config(dir.path(), &gem);

    Command::cargo_bin("gemstall")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "fetch", "sleet@0.4.0"])
        .assert()
        .success();

    assert!(dir.path().join("cache/sleet-0.4.0.gem").exists());
    assert!(!dir.path().join("prefixes").exists());
}

#[test]
fn test_evict_is_idempotent_from_the_cli() {
    let dir = tempdir().unwrap();
    let gem = write_stub_gem(dir.path());
    let config = write_config(dir.path(), &gem);

    Command::cargo_bin("gemstall")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "fetch", "sleet@0.4.0"])
        .assert()
        .success();

    for _ in 0..2 {
        Command::cargo_bin("gemstall")
            .unwrap()
            .args(["--config", config.to_str().unwrap(), "evict", "sleet@0.4.0"])
            .assert()
            .success();
    }
    assert!(!dir.path().join("cache/sleet-0.4.0.gem").exists());
}

#[test]
fn test_list_which_and_uninstall() {
    let dir = tempdir().unwrap();
    let gem = write_stub_gem(dir.path());
    let config = write_config(dir.path(), &gem);

    Command::cargo_bin("gemstall")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "install", "sleet@0.4.0"])
        .assert()
        .success();

    let output = Command::cargo_bin("gemstall")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "list"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert!(String::from_utf8_lossy(&output).contains("sleet@0.4.0"));

    let output = Command::cargo_bin("gemstall")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "which", "sleet"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert!(String::from_utf8_lossy(&output).contains("bin/sleet"));

    Command::cargo_bin("gemstall")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "uninstall", "sleet@0.4.0"])
        .assert()
        .success();
    assert!(!dir.path().join("prefixes/sleet").exists());
}

#[test]
fn test_invalid_package_spec_fails() {
    let dir = tempdir().unwrap();
    let gem = write_stub_gem(dir.path());
    let config = write_config(dir.path(), &gem);

    Command::cargo_bin("gemstall")
        .unwrap()
        .args(["--config", config.to_str().unwrap(), "install", "sleet"])
        .assert()
        .failure();
}
