//! Immutable per-invocation context.
//!
//! The context is constructed once, before the first lifecycle step, and
//! borrowed by every step afterwards. There is deliberately no mutable
//! process-global configuration anywhere in the runner.

use std::path::{Path, PathBuf};

use crate::recipe::Recipe;
use crate::settings::BuildSettings;

/// Conventional location of the test sources relative to the build
/// directory: a sibling directory two levels up.
pub const DEFAULT_SOURCE_FOLDER: &str = "../../tests";

/// Resolved filesystem layout of one package test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildLayout {
    /// Package-test root (where the recipe manifest lives).
    pub root: PathBuf,
    /// Working directory for this invocation: `<root>/build/<build-id>`.
    pub build_dir: PathBuf,
    /// Test project sources (must contain `CMakeLists.txt`).
    pub source_dir: PathBuf,
}

impl BuildLayout {
    /// Compute the layout for a root, settings record and recipe.
    ///
    /// `source_override` wins over the recipe's `source_folder`; both are
    /// resolved against the build directory when relative, so the manifest
    /// value `../../tests` reproduces the default.
    pub fn new(
        root: &Path,
        settings: &BuildSettings,
        recipe: &Recipe,
        source_override: Option<&Path>,
    ) -> Self {
        let build_dir = root.join("build").join(settings.build_id());
        let source_dir = match source_override.or(recipe.source_folder.as_deref()) {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => build_dir.join(path),
            None => build_dir.join(DEFAULT_SOURCE_FOLDER),
        };
        Self {
            root: root.to_path_buf(),
            build_dir,
            source_dir,
        }
    }
}

/// Everything a lifecycle step is allowed to see.
#[derive(Debug, Clone)]
pub struct TestContext {
    /// Build settings supplied by the invoking host.
    pub settings: BuildSettings,
    /// The loaded recipe.
    pub recipe: Recipe,
    /// Resolved filesystem layout.
    pub layout: BuildLayout,
}

impl TestContext {
    /// Assemble a context from its parts, computing the layout.
    pub fn new(
        root: &Path,
        settings: BuildSettings,
        recipe: Recipe,
        source_override: Option<&Path>,
    ) -> Self {
        let layout = BuildLayout::new(root, &settings, &recipe, source_override);
        Self {
            settings,
            recipe,
            layout,
        }
    }
}
