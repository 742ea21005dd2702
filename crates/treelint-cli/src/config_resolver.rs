//! Finds and loads the configuration for a scan.
//!
//! Lookup order:
//!
//! 1. `--config` flag
//! 2. the nearest `treelint.toml` or `.treelint.toml` in the scan root or
//!    one of its ancestors
//! 3. `$TREELINT_CONFIG_DIR/config.toml` or `~/.treelint/config.toml`
//! 4. built-in defaults
//!
//! A relative `[runner] root` in an explicit or project file is taken
//! relative to the directory holding that file. In the global file it stays
//! relative to the working directory.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use treelint_core::Config;

/// Project-level config file names, checked in order within each directory.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["treelint.toml", ".treelint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

const CONFIG_DIR_ENV: &str = "TREELINT_CONFIG_DIR";

/// Loads the configuration that applies to a scan of `scan_root`.
///
/// # Errors
///
/// Returns an error if the selected file cannot be read or parsed. A missing
/// `--config` file is an error; a missing project or global file is not.
pub fn load(scan_root: &Path, explicit: Option<&Path>) -> Result<Config> {
    load_inner(scan_root, explicit, global_config_dir())
}

/// Takes `global_dir` as a parameter so tests need not touch the environment.
fn load_inner(scan_root: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> Result<Config> {
    if let Some(path) = explicit {
        return read_anchored(path);
    }

    if let Some(path) = find_project_config(scan_root) {
        tracing::debug!("Found project config: {}", path.display());
        return read_anchored(&path);
    }

    if let Some(path) = global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|p| p.is_file())
    {
        tracing::info!("Using global config: {}", path.display());
        return read(&path);
    }

    Ok(Config::default())
}

/// Searches `scan_root` and then each ancestor for a project config file.
fn find_project_config(scan_root: &Path) -> Option<PathBuf> {
    let start = scan_root
        .canonicalize()
        .unwrap_or_else(|_| scan_root.to_path_buf());

    start.ancestors().find_map(|dir| {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

fn read(path: &Path) -> Result<Config> {
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Reads a config whose relative scan root belongs to the file's directory.
fn read_anchored(path: &Path) -> Result<Config> {
    let mut config = read(path)?;
    if config.runner.root.is_relative() {
        if let Some(dir) = path.parent() {
            config.runner.root = dir.join(&config.runner.root);
        }
    }
    Ok(config)
}

/// Returns the global config directory: `$TREELINT_CONFIG_DIR`, else
/// `~/.treelint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".treelint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn explicit_file_wins_over_project() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("trees/treelint.toml"), "preset = \"recommended\"\n");
        let explicit = tmp.path().join("ci/custom.toml");
        write(&explicit, "preset = \"all\"\n");

        let config = load_inner(&tmp.path().join("trees"), Some(&explicit), None).unwrap();
        assert_eq!(config.preset.as_deref(), Some("all"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.toml");
        assert!(load_inner(tmp.path(), Some(&missing), None).is_err());
    }

    #[test]
    fn nearest_ancestor_config_applies() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("treelint.toml"), "preset = \"all\"\n");
        write(&tmp.path().join("web/.treelint.toml"), "preset = \"recommended\"\n");
        let scan_root = tmp.path().join("web/build/trees");
        fs::create_dir_all(&scan_root).unwrap();

        let config = load_inner(&scan_root, None, None).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));

        let config = load_inner(&tmp.path().join("web/../"), None, None).unwrap();
        assert_eq!(config.preset.as_deref(), Some("all"));
    }

    #[test]
    fn plain_name_preferred_over_dot_prefix() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join(".treelint.toml"), "preset = \"recommended\"\n");
        write(&tmp.path().join("treelint.toml"), "preset = \"all\"\n");

        let config = load_inner(tmp.path(), None, None).unwrap();
        assert_eq!(config.preset.as_deref(), Some("all"));
    }

    #[test]
    fn project_root_is_relative_to_config_file() {
        let tmp = TempDir::new().unwrap();
        let project = tmp.path().join("project");
        write(&project.join("treelint.toml"), "[runner]\nroot = \"out/trees\"\n");
        fs::create_dir_all(project.join("src")).unwrap();

        let config = load_inner(&project.join("src"), None, None).unwrap();
        let expected = project.canonicalize().unwrap().join("out/trees");
        assert_eq!(config.runner.root, expected);
    }

    #[test]
    fn absolute_root_is_kept() {
        let tmp = TempDir::new().unwrap();
        let trees = tmp.path().join("elsewhere");
        let content = format!("[runner]\nroot = {:?}\n", trees.to_string_lossy());
        write(&tmp.path().join("treelint.toml"), &content);

        let config = load_inner(tmp.path(), None, None).unwrap();
        assert_eq!(config.runner.root, trees);
    }

    #[test]
    fn global_file_is_the_fallback() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        write(
            &global.path().join("config.toml"),
            "preset = \"all\"\n[runner]\nroot = \"trees\"\n",
        );

        let config = load_inner(project.path(), None, Some(global.path().to_path_buf())).unwrap();
        assert_eq!(config.preset.as_deref(), Some("all"));
        assert_eq!(config.runner.root, PathBuf::from("trees"));
    }

    #[test]
    fn project_file_shadows_global_file() {
        let project = TempDir::new().unwrap();
        write(&project.path().join("treelint.toml"), "preset = \"recommended\"\n");
        let global = TempDir::new().unwrap();
        write(&global.path().join("config.toml"), "preset = \"all\"\n");

        let config = load_inner(project.path(), None, Some(global.path().to_path_buf())).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
    }

    #[test]
    fn defaults_when_nothing_is_found() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let config = load_inner(project.path(), None, Some(global.path().to_path_buf())).unwrap();
        assert!(config.preset.is_none());
        assert_eq!(config.runner.root, PathBuf::from("."));
    }
}
