//! Core domain types and port definitions for pkgtest.
//!
//! This crate is pure: it owns the settings and recipe domain types, the
//! package-test lifecycle contract, and the ports implemented by the runtime
//! adapter. Nothing in here spawns a process or touches the network.

pub mod context;
pub mod lifecycle;
pub mod paths;
pub mod ports;
pub mod recipe;
pub mod settings;
pub mod system;

// Re-export commonly used types for convenience
pub use context::{BuildLayout, TestContext};
pub use lifecycle::{
    LifecycleError, Op, PackageTest, Stage, StageFailure, TestOutcome, TestReport, run,
};
pub use paths::{PathError, cache_root, data_root, ensure_directory};
pub use ports::SystemProbePort;
pub use recipe::{Generator, MANIFEST_NAME, Recipe, RecipeError, Requirement};
pub use settings::{Arch, BuildSettings, BuildType, Compiler, Os, SettingsError};
pub use system::{Dependency, DependencyStatus};
