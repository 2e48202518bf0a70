//! Test recipe: the declarative side of a package test.
//!
//! A recipe names the build-time-only requirements (test frameworks and the
//! like — never part of the consumer's own dependency graph), selects which
//! build-system integration files to materialize, and optionally points at
//! the test sources. It is loaded once from a `pkgtest.json` manifest at the
//! package-test root and never mutated afterwards.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// File name of the recipe manifest at the package-test root.
pub const MANIFEST_NAME: &str = "pkgtest.json";

/// Errors produced while loading a recipe manifest.
#[derive(Debug, Error)]
pub enum RecipeError {
    /// No manifest at the expected location.
    #[error("recipe manifest not found at {0}")]
    ManifestNotFound(PathBuf),

    /// Manifest exists but could not be read.
    #[error("failed to read recipe manifest {path}: {reason}")]
    ManifestRead { path: PathBuf, reason: String },

    /// Manifest is not valid JSON or has the wrong shape.
    #[error("failed to parse recipe manifest {path}: {reason}")]
    ManifestParse { path: PathBuf, reason: String },

    /// A requirement entry is not a well-formed `name/version` pair.
    #[error("invalid requirement '{0}': expected the form name/version")]
    InvalidRequirement(String),
}

/// A build-time-only dependency reference, e.g. `catch2/2.9.2`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Requirement {
    pub name: String,
    pub version: String,
}

impl Requirement {
    /// Construct from already-validated parts.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

impl FromStr for Requirement {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((name, version)) = s.split_once('/') else {
            return Err(RecipeError::InvalidRequirement(s.to_string()));
        };
        if name.is_empty() || version.is_empty() || version.contains('/') {
            return Err(RecipeError::InvalidRequirement(s.to_string()));
        }
        Ok(Self::new(name, version))
    }
}

/// Build-system integration files the runner materializes before configure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generator {
    /// Per-dependency include/lib variables plus a setup macro
    /// (`pkgtest_buildinfo.cmake`).
    Cmake,
    /// Prefix and module path resolution, injected into every configure
    /// (`pkgtest_paths.cmake`).
    CmakePaths,
    /// A `Find<Name>.cmake` module per dependency.
    CmakeFindPackage,
}

impl Generator {
    /// All generators, in emission order. This is the default selection when
    /// a manifest does not narrow it down.
    pub const ALL: [Self; 3] = [Self::Cmake, Self::CmakePaths, Self::CmakeFindPackage];
}

/// A loaded, validated test recipe.
#[derive(Debug, Clone)]
pub struct Recipe {
    /// Ordered build-time-only requirements.
    pub requires: Vec<Requirement>,
    /// Selected integration-file generators.
    pub generators: Vec<Generator>,
    /// Test sources location. Relative paths are resolved against the build
    /// directory; `None` means the conventional `../../tests`.
    pub source_folder: Option<PathBuf>,
}

/// Raw manifest shape; kept separate so validation happens in one place.
#[derive(Debug, Deserialize)]
struct RecipeManifest {
    #[serde(default)]
    requires: Vec<String>,
    #[serde(default)]
    generators: Option<Vec<Generator>>,
    #[serde(default)]
    source_folder: Option<PathBuf>,
}

impl Recipe {
    /// Load the manifest from a package-test root directory.
    pub fn load(root: &Path) -> Result<Self, RecipeError> {
        let path = root.join(MANIFEST_NAME);
        if !path.is_file() {
            return Err(RecipeError::ManifestNotFound(path));
        }
        let text = std::fs::read_to_string(&path).map_err(|e| RecipeError::ManifestRead {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        let manifest: RecipeManifest =
            serde_json::from_str(&text).map_err(|e| RecipeError::ManifestParse {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let requires = manifest
            .requires
            .iter()
            .map(|entry| entry.parse())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            requires,
            generators: manifest.generators.unwrap_or_else(|| Generator::ALL.to_vec()),
            source_folder: manifest.source_folder,
        })
    }

    /// An empty recipe: no requirements, full generator set.
    pub fn empty() -> Self {
        Self {
            requires: Vec::new(),
            generators: Generator::ALL.to_vec(),
            source_folder: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn requirement_parses_name_version_pair() {
        let req: Requirement = "catch2/2.9.2".parse().unwrap();
        assert_eq!(req.name, "catch2");
        assert_eq!(req.version, "2.9.2");
        assert_eq!(req.to_string(), "catch2/2.9.2");
    }

    #[test]
    fn requirement_rejects_malformed_input() {
        for bad in ["catch2", "/2.9.2", "catch2/", "a/b/c", ""] {
            assert!(bad.parse::<Requirement>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn manifest_loads_with_declared_order_preserved() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_NAME),
            r#"{
                "requires": ["catch2/2.9.2", "fakeit/2.0.9"],
                "generators": ["cmake", "cmake_paths", "cmake_find_package"]
            }"#,
        )
        .unwrap();

        let recipe = Recipe::load(dir.path()).unwrap();
        assert_eq!(recipe.requires[0].name, "catch2");
        assert_eq!(recipe.requires[1].name, "fakeit");
        assert_eq!(recipe.generators.len(), 3);
        assert!(recipe.source_folder.is_none());
    }

    #[test]
    fn manifest_defaults_generators_when_absent() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_NAME), r#"{"requires": []}"#).unwrap();

        let recipe = Recipe::load(dir.path()).unwrap();
        assert_eq!(recipe.generators, Generator::ALL.to_vec());
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Recipe::load(dir.path()),
            Err(RecipeError::ManifestNotFound(_))
        ));
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(MANIFEST_NAME), "not json").unwrap();
        assert!(matches!(
            Recipe::load(dir.path()),
            Err(RecipeError::ManifestParse { .. })
        ));
    }

    #[test]
    fn bad_requirement_in_manifest_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_NAME),
            r#"{"requires": ["catch2"]}"#,
        )
        .unwrap();
        assert!(matches!(
            Recipe::load(dir.path()),
            Err(RecipeError::InvalidRequirement(_))
        ));
    }
}
