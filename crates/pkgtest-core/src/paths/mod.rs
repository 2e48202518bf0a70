//! Filesystem layout shared by every surface of pkgtest.
//!
//! Two roots matter: the per-invocation build directory (owned by
//! `BuildLayout` in the context module) and the persistent local package
//! cache, which stands in for the host package manager's registry.

mod error;

pub use error::PathError;

use std::path::{Path, PathBuf};

/// Directory name under the platform data dir.
const APP_DIR: &str = "pkgtest";

/// Environment variable overriding the package cache location.
pub const CACHE_DIR_ENV: &str = "PKGTEST_CACHE_DIR";

/// Root of all persistent pkgtest data: `<platform data dir>/pkgtest`.
pub fn data_root() -> Result<PathBuf, PathError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(PathError::NoDataDir)
}

/// Root of the local package cache, honoring [`CACHE_DIR_ENV`].
pub fn cache_root() -> Result<PathBuf, PathError> {
    cache_root_from(std::env::var_os(CACHE_DIR_ENV))
}

fn cache_root_from(env_override: Option<std::ffi::OsString>) -> Result<PathBuf, PathError> {
    match env_override {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Ok(data_root()?.join("cache")),
    }
}

/// Create a directory (and parents) if needed, verifying it really is one.
pub fn ensure_directory(path: &Path) -> Result<(), PathError> {
    if path.exists() {
        if path.is_dir() {
            return Ok(());
        }
        return Err(PathError::NotADirectory(path.to_path_buf()));
    }
    std::fs::create_dir_all(path).map_err(|e| PathError::CreateFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn ensure_directory_creates_nested_paths() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());
        // Idempotent on an existing directory.
        ensure_directory(&nested).unwrap();
    }

    #[test]
    fn ensure_directory_rejects_files() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not-a-dir");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            ensure_directory(&file),
            Err(PathError::NotADirectory(_))
        ));
    }

    #[test]
    fn cache_root_honors_the_env_override() {
        let resolved = cache_root_from(Some("/custom/cache".into())).unwrap();
        assert_eq!(resolved, PathBuf::from("/custom/cache"));
    }

    #[test]
    fn cache_root_ignores_an_empty_override() {
        let resolved = cache_root_from(Some("".into())).unwrap();
        assert!(resolved.ends_with("cache"));
    }
}
