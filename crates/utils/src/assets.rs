use std::{io, path::PathBuf};

use directories::ProjectDirs;

const PROJECT_ROOT: &str = env!("CARGO_MANIFEST_DIR");
pub const ASSET_DIR_ENV: &str = "ISSUE_TRACKER_ASSET_DIR";

/// Directory holding the config file and the default SQLite store, created on demand.
pub fn asset_dir() -> io::Result<PathBuf> {
    let path = match std::env::var(ASSET_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir.trim()),
        _ => default_asset_dir()?,
    };

    if !path.exists() {
        std::fs::create_dir_all(&path)?;
    }
    Ok(path)
}

fn default_asset_dir() -> io::Result<PathBuf> {
    if cfg!(debug_assertions) {
        return Ok(PathBuf::from(PROJECT_ROOT).join("../../dev_assets"));
    }

    // Linux: ~/.local/share/issue-tracker, macOS: ~/Library/Application Support/dev.issue-tracker.issue-tracker
    ProjectDirs::from("dev", "issue-tracker", "issue-tracker")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory available"))
}

pub fn config_path() -> io::Result<PathBuf> {
    Ok(asset_dir()?.join("config.json"))
}

pub fn database_path() -> io::Result<PathBuf> {
    Ok(asset_dir()?.join("issues.sqlite"))
}

#[cfg(test)]
mod tests {
    use test_support::EnvGuard;

    use super::*;

    #[test]
    fn env_override_is_created_and_used() {
        let temp = test_support::temp_dir();
        let target = temp.path().join("nested").join("assets");
        let mut env = EnvGuard::new();
        env.set(ASSET_DIR_ENV, &target.to_string_lossy());

        let dir = asset_dir().unwrap();
        assert_eq!(dir, target);
        assert!(dir.is_dir());
        assert_eq!(config_path().unwrap(), target.join("config.json"));
        assert_eq!(database_path().unwrap(), target.join("issues.sqlite"));
    }

    #[test]
    fn debug_builds_default_to_dev_assets() {
        if cfg!(debug_assertions) {
            assert!(default_asset_dir().unwrap().ends_with("dev_assets"));
        }
    }
}
