//! CLI-specific error types and mappings.
//!
//! This module maps lifecycle and input errors to exit codes and
//! user-facing messages. The process exit code is the contract with the
//! invoking host: 0 means every test case passed (or execution was skipped
//! for a cross build), anything else names a failure category.

use pkgtest_core::{LifecycleError, StageFailure};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The package test itself failed (build, resolution or test cases).
    #[error("{0}")]
    Failed(String),

    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error (recipe, settings, paths).
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error (failed package test)
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Failed(_) => 1,
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<StageFailure> for CliError {
    fn from(failure: StageFailure) -> Self {
        let message = failure.to_string();
        match &failure.source {
            LifecycleError::Recipe(_)
            | LifecycleError::Settings(_)
            | LifecycleError::Path(_)
            | LifecycleError::SourcesMissing { .. } => Self::Config(message),
            LifecycleError::Io(_) => Self::Io(message),
            LifecycleError::DependencyUnresolved { .. }
            | LifecycleError::ConfigureFailed(_)
            | LifecycleError::BuildFailed(_)
            | LifecycleError::TestsFailed { .. } => Self::Failed(message),
        }
    }
}

impl From<LifecycleError> for CliError {
    fn from(err: LifecycleError) -> Self {
        let message = err.to_string();
        match err {
            LifecycleError::Recipe(_)
            | LifecycleError::Settings(_)
            | LifecycleError::Path(_) => Self::Config(message),
            LifecycleError::Io(_) => Self::Io(message),
            _ => Self::Failed(message),
        }
    }
}

impl From<pkgtest_core::RecipeError> for CliError {
    fn from(err: pkgtest_core::RecipeError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<pkgtest_core::SettingsError> for CliError {
    fn from(err: pkgtest_core::SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgtest_core::Op;

    #[test]
    fn exit_codes_are_stable() {
        assert_eq!(CliError::Failed("x".into()).exit_code(), 1);
        assert_eq!(CliError::Arguments("x".into()).exit_code(), 2);
        assert_eq!(CliError::Io("x".into()).exit_code(), 74);
        assert_eq!(CliError::Config("x".into()).exit_code(), 78);
    }

    #[test]
    fn failing_tests_map_to_the_general_failure_code() {
        let failure = StageFailure {
            during: Op::Test,
            source: LifecycleError::TestsFailed { code: 8 },
        };
        let err = CliError::from(failure);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("ctest exit code 8"));
    }

    #[test]
    fn missing_sources_map_to_the_config_code() {
        let failure = StageFailure {
            during: Op::Build,
            source: LifecycleError::SourcesMissing {
                path: "/pkg/tests".into(),
            },
        };
        assert_eq!(CliError::from(failure).exit_code(), 78);
    }
}
