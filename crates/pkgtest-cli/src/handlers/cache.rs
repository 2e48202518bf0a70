//! Local package cache maintenance.

use std::path::Path;

use pkgtest_core::{Requirement, RecipeError};
use pkgtest_runtime::PackageCache;

use crate::error::CliError;

/// Copy a prepared package directory into the cache.
pub fn add(reference: &str, dir: &Path) -> Result<(), CliError> {
    let requirement: Requirement = reference
        .parse()
        .map_err(|e: RecipeError| CliError::Arguments(e.to_string()))?;
    let cache = PackageCache::open_default()?;
    let dest = cache.add(&requirement, dir)?;
    println!("✓ Cached {requirement} at {}", dest.display());
    Ok(())
}

/// List cached packages.
pub fn list() -> Result<(), CliError> {
    let cache = PackageCache::open_default()?;
    let entries = cache.list()?;
    if entries.is_empty() {
        println!("Package cache is empty ({})", cache.root().display());
        return Ok(());
    }
    for requirement in entries {
        println!("{requirement}");
    }
    Ok(())
}
