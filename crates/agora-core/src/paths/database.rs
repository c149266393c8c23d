//! Database path resolution.

use std::env;
use std::path::PathBuf;

use super::error::PathError;
use super::platform::{data_root, ensure_dir, normalize_user_path};

/// Environment variable pointing at an explicit database file.
pub const DATABASE_PATH_ENV: &str = "AGORA_DATABASE_PATH";

/// Get the path to the agora database file.
///
/// `AGORA_DATABASE_PATH` wins when set; otherwise `agora.db` in the `data/`
/// subdirectory of the data root. The parent directory is created if needed.
pub fn database_path() -> Result<PathBuf, PathError> {
    if let Ok(raw) = env::var(DATABASE_PATH_ENV)
        && !raw.trim().is_empty()
    {
        let path = normalize_user_path(&raw)?;
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        return Ok(path);
    }

    let data_dir = data_root()?.join("data");
    ensure_dir(&data_dir)?;
    Ok(data_dir.join("agora.db"))
}
