//! Path utilities for agora data directories.
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O; adapters report paths themselves

mod database;
mod error;
mod platform;
mod resolver;

#[cfg(test)]
mod test_utils;

pub use database::{DATABASE_PATH_ENV, database_path};
pub use error::PathError;
pub use platform::{DATA_DIR_ENV, data_root, normalize_user_path};
pub use resolver::ResolvedPaths;
