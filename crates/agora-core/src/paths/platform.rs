//! Data root resolution.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV: &str = "AGORA_DATA_DIR";

/// Get the root directory for application data (database, uploads).
///
/// Resolution order:
/// 1. `AGORA_DATA_DIR` environment variable (highest priority)
/// 2. System data directory (e.g., `~/.local/share/agora`)
///
/// The directory is created if it does not exist.
pub fn data_root() -> Result<PathBuf, PathError> {
    let root = match env::var(DATA_DIR_ENV) {
        Ok(path) if !path.trim().is_empty() => normalize_user_path(&path)?,
        _ => dirs::data_local_dir()
            .ok_or(PathError::NoDataDir)?
            .join("agora"),
    };

    ensure_dir(&root)?;
    Ok(root)
}

pub(super) fn ensure_dir(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if !path.is_dir() {
            return Err(PathError::NotADirectory(path.to_path_buf()));
        }
        return Ok(());
    }
    fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};

    #[test]
    fn test_data_root_honours_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("agora");
        let _env = EnvVarGuard::set(DATA_DIR_ENV, target.to_str().unwrap());

        let root = data_root().unwrap();
        assert_eq!(root, target);
        assert!(root.is_dir());
    }

    #[test]
    fn test_data_root_rejects_file() {
        let _lock = ENV_LOCK.lock().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        fs::write(&file, b"x").unwrap();
        let _env = EnvVarGuard::set(DATA_DIR_ENV, file.to_str().unwrap());

        assert!(matches!(data_root(), Err(PathError::NotADirectory(_))));
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(matches!(normalize_user_path("  "), Err(PathError::EmptyPath)));
    }

    #[test]
    fn test_normalize_makes_relative_absolute() {
        let path = normalize_user_path("some/dir").unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with("some/dir"));
    }
}
