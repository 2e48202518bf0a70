//! Requirement resolution against the local package cache.
//!
//! The cache plays the role a package manager's registry would: packages
//! live under `<cache>/<name>/<version>/` with conventional `include/` and
//! `lib/` subdirectories. Resolution is a pure presence check; nothing is
//! fetched or built here.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use pkgtest_core::paths::{cache_root, ensure_directory};
use pkgtest_core::{LifecycleError, PathError, Requirement};

/// A requirement located in the cache, with its discovered layout.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    /// The requirement this package satisfies.
    pub requirement: Requirement,
    /// Package root inside the cache.
    pub root: PathBuf,
    /// Existing header directories (`include/`).
    pub include_dirs: Vec<PathBuf>,
    /// Existing library directories (`lib/`, `lib64/`).
    pub lib_dirs: Vec<PathBuf>,
}

/// Handle to a package cache directory.
#[derive(Debug, Clone)]
pub struct PackageCache {
    root: PathBuf,
}

impl PackageCache {
    /// Open the default cache (`PKGTEST_CACHE_DIR` or the platform data
    /// dir).
    pub fn open_default() -> Result<Self, LifecycleError> {
        Ok(Self { root: cache_root()? })
    }

    /// Open a cache at an explicit location.
    pub const fn at(root: PathBuf) -> Self {
        Self { root }
    }

    /// The cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look a single requirement up. `None` means not cached.
    pub fn lookup(&self, requirement: &Requirement) -> Option<ResolvedPackage> {
        let root = self.root.join(&requirement.name).join(&requirement.version);
        if !root.is_dir() {
            return None;
        }
        let existing = |names: &[&str]| -> Vec<PathBuf> {
            names
                .iter()
                .map(|name| root.join(name))
                .filter(|dir| dir.is_dir())
                .collect()
        };
        Some(ResolvedPackage {
            requirement: requirement.clone(),
            include_dirs: existing(&["include"]),
            lib_dirs: existing(&["lib", "lib64"]),
            root,
        })
    }

    /// Resolve every declared requirement, preserving declaration order.
    ///
    /// Fails on the first missing requirement, before any build step runs.
    pub fn resolve_all(
        &self,
        requirements: &[Requirement],
    ) -> Result<Vec<ResolvedPackage>, LifecycleError> {
        requirements
            .iter()
            .map(|requirement| {
                let resolved = self.lookup(requirement).ok_or_else(|| {
                    LifecycleError::DependencyUnresolved {
                        reference: requirement.to_string(),
                    }
                })?;
                debug!(requirement = %requirement, root = %resolved.root.display(), "resolved");
                Ok(resolved)
            })
            .collect()
    }

    /// Copy a prepared package directory into the cache, standing in for the
    /// registry fetch a real host would perform.
    pub fn add(&self, requirement: &Requirement, source: &Path) -> Result<PathBuf, LifecycleError> {
        if !source.is_dir() {
            return Err(PathError::NotADirectory(source.to_path_buf()).into());
        }
        let dest = self.root.join(&requirement.name).join(&requirement.version);
        ensure_directory(&dest)?;
        copy_dir_recursive(source, &dest)?;
        Ok(dest)
    }

    /// Enumerate cached `name/version` pairs, sorted.
    pub fn list(&self) -> Result<Vec<Requirement>, LifecycleError> {
        let mut entries = Vec::new();
        let names = match std::fs::read_dir(&self.root) {
            Ok(iter) => iter,
            // An absent cache is just empty.
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(entries),
            Err(e) => return Err(e.into()),
        };
        for name_entry in names.flatten() {
            if !name_entry.path().is_dir() {
                continue;
            }
            let name = name_entry.file_name().to_string_lossy().into_owned();
            for version_entry in std::fs::read_dir(name_entry.path())?.flatten() {
                if version_entry.path().is_dir() {
                    let version = version_entry.file_name().to_string_lossy().into_owned();
                    entries.push(Requirement::new(name.clone(), version));
                }
            }
        }
        entries.sort();
        Ok(entries)
    }
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            std::fs::create_dir_all(&target)?;
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
