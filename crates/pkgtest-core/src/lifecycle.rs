//! The package-test lifecycle contract.
//!
//! The host-invoked lifecycle hooks of the original recipe format become an
//! explicit interface here: four required operations, one concrete
//! implementation (the CMake runner in `pkgtest-runtime`). The driver walks
//! the stages in a fixed order and stops at the first failure:
//!
//! ```text
//! Created → Configured → Built → (Skipped | Tested)
//! ```
//!
//! Linear, no cycles, and no branching besides the cross-building guard
//! inside the `test` operation.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use crate::context::TestContext;
use crate::paths::PathError;
use crate::recipe::RecipeError;
use crate::settings::SettingsError;

/// Everything that can go wrong inside a lifecycle step.
///
/// Nothing here is recovered or retried; every variant aborts the package
/// test and propagates to the invoking host.
#[derive(Debug, Error)]
pub enum LifecycleError {
    // === Resolution ===
    /// A declared build-time requirement is not in the local package cache.
    #[error("unresolved requirement {reference}: not present in the local package cache")]
    DependencyUnresolved { reference: String },

    // === Build ===
    /// The test-sources directory is absent or has no CMakeLists.txt.
    #[error("test sources not found at {path} (expected a directory containing CMakeLists.txt)")]
    SourcesMissing { path: PathBuf },

    /// The external build tool could not generate build files.
    #[error("CMake configuration failed: {0}")]
    ConfigureFailed(String),

    /// Compilation or linking failed.
    #[error("build failed: {0}")]
    BuildFailed(String),

    // === Test ===
    /// One or more test cases inside the compiled binary failed.
    #[error("test run failed (ctest exit code {code})")]
    TestsFailed { code: i32 },

    // === Inputs & environment ===
    /// Recipe manifest problem.
    #[error(transparent)]
    Recipe(#[from] RecipeError),

    /// Settings problem.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Path resolution or directory creation problem.
    #[error(transparent)]
    Path(#[from] PathError),

    /// IO failure while driving the external tools.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// States of the lifecycle machine. Terminal on first failure at any stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Created,
    Configured,
    Built,
    /// Test execution skipped because the settings are cross-building.
    Skipped,
    Tested,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Configured => "configured",
            Self::Built => "built",
            Self::Skipped => "skipped",
            Self::Tested => "tested",
        };
        write!(f, "{name}")
    }
}

/// The four lifecycle operations, for failure attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Configure,
    Build,
    Imports,
    Test,
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Imports => "imports",
            Self::Test => "test",
        };
        write!(f, "{name}")
    }
}

/// A lifecycle failure, attributed to the operation it occurred in.
#[derive(Debug, Error)]
#[error("package test failed during {during}: {source}")]
pub struct StageFailure {
    /// The operation that failed.
    pub during: Op,
    /// The underlying error.
    #[source]
    pub source: LifecycleError,
}

/// How a completed lifecycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// Every test case in the compiled binary passed.
    Passed,
    /// Execution was skipped; this is success, not failure.
    Skipped { reason: String },
}

/// Result of a successful lifecycle run.
#[derive(Debug, Clone)]
pub struct TestReport {
    /// The terminal stage reached (`Tested` or `Skipped`).
    pub terminal: Stage,
    /// Outcome of the test step.
    pub outcome: TestOutcome,
    /// Wall-clock time for the whole lifecycle.
    pub elapsed: Duration,
}

/// The package-test interface: exactly four required operations.
///
/// Implementations receive the immutable [`TestContext`] on every call and
/// must uphold the stage order — the driver guarantees `build` is never
/// invoked unless `configure` succeeded, and `test` never unless `build`
/// succeeded.
#[cfg_attr(test, mockall::automock)]
pub trait PackageTest {
    /// Resolve declared requirements and materialize the selected
    /// build-system integration files.
    fn configure(&self, ctx: &TestContext) -> Result<(), LifecycleError>;

    /// Invoke the external build tool's configure and build steps against
    /// the test sources.
    fn build(&self, ctx: &TestContext) -> Result<(), LifecycleError>;

    /// Copy runtime artifacts next to the test binary, when any are needed.
    fn imports(&self, ctx: &TestContext) -> Result<(), LifecycleError>;

    /// Execute the compiled test binary, or skip when cross-building.
    fn test(&self, ctx: &TestContext) -> Result<TestOutcome, LifecycleError>;
}

/// Drive the full lifecycle against a context.
///
/// Stops at the first failing operation and reports which one failed. A
/// cross-building skip is a successful terminal state.
pub fn run(test: &dyn PackageTest, ctx: &TestContext) -> Result<TestReport, StageFailure> {
    let started = Instant::now();
    let fail = |during: Op| move |source| StageFailure { during, source };

    debug!(settings = %ctx.settings, stage = %Stage::Created, "starting package test");
    test.configure(ctx).map_err(fail(Op::Configure))?;
    debug!(stage = %Stage::Configured, "configure complete");

    test.build(ctx).map_err(fail(Op::Build))?;
    debug!(stage = %Stage::Built, "build complete");

    test.imports(ctx).map_err(fail(Op::Imports))?;

    let outcome = test.test(ctx).map_err(fail(Op::Test))?;
    let terminal = match &outcome {
        TestOutcome::Passed => Stage::Tested,
        TestOutcome::Skipped { reason } => {
            debug!(reason = %reason, "test execution skipped");
            Stage::Skipped
        }
    };

    Ok(TestReport {
        terminal,
        outcome,
        elapsed: started.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::Recipe;
    use crate::settings::BuildSettings;
    use std::path::Path;

    fn ctx() -> TestContext {
        TestContext::new(
            Path::new("/pkg"),
            BuildSettings::host_defaults(),
            Recipe::empty(),
            None,
        )
    }

    #[test]
    fn full_lifecycle_reaches_tested() {
        let mut mock = MockPackageTest::new();
        mock.expect_configure().times(1).returning(|_| Ok(()));
        mock.expect_build().times(1).returning(|_| Ok(()));
        mock.expect_imports().times(1).returning(|_| Ok(()));
        mock.expect_test()
            .times(1)
            .returning(|_| Ok(TestOutcome::Passed));

        let report = run(&mock, &ctx()).unwrap();
        assert_eq!(report.terminal, Stage::Tested);
        assert_eq!(report.outcome, TestOutcome::Passed);
    }

    #[test]
    fn configure_failure_stops_before_build() {
        let mut mock = MockPackageTest::new();
        mock.expect_configure().times(1).returning(|_| {
            Err(LifecycleError::DependencyUnresolved {
                reference: "catch2/2.9.2".into(),
            })
        });
        mock.expect_build().times(0);
        mock.expect_imports().times(0);
        mock.expect_test().times(0);

        let failure = run(&mock, &ctx()).unwrap_err();
        assert_eq!(failure.during, Op::Configure);
        assert!(matches!(
            failure.source,
            LifecycleError::DependencyUnresolved { .. }
        ));
    }

    #[test]
    fn build_failure_stops_before_test() {
        let mut mock = MockPackageTest::new();
        mock.expect_configure().times(1).returning(|_| Ok(()));
        mock.expect_build()
            .times(1)
            .returning(|_| Err(LifecycleError::BuildFailed("cc exited with 1".into())));
        mock.expect_imports().times(0);
        mock.expect_test().times(0);

        let failure = run(&mock, &ctx()).unwrap_err();
        assert_eq!(failure.during, Op::Build);
    }

    #[test]
    fn skip_is_a_successful_terminal_state() {
        let mut mock = MockPackageTest::new();
        mock.expect_configure().times(1).returning(|_| Ok(()));
        mock.expect_build().times(1).returning(|_| Ok(()));
        mock.expect_imports().times(1).returning(|_| Ok(()));
        mock.expect_test().times(1).returning(|_| {
            Ok(TestOutcome::Skipped {
                reason: "cross-building for linux/armv7".into(),
            })
        });

        let report = run(&mock, &ctx()).unwrap();
        assert_eq!(report.terminal, Stage::Skipped);
        assert!(matches!(report.outcome, TestOutcome::Skipped { .. }));
    }

    #[test]
    fn failing_tests_propagate_with_the_exit_code() {
        let mut mock = MockPackageTest::new();
        mock.expect_configure().times(1).returning(|_| Ok(()));
        mock.expect_build().times(1).returning(|_| Ok(()));
        mock.expect_imports().times(1).returning(|_| Ok(()));
        mock.expect_test()
            .times(1)
            .returning(|_| Err(LifecycleError::TestsFailed { code: 8 }));

        let failure = run(&mock, &ctx()).unwrap_err();
        assert_eq!(failure.during, Op::Test);
        assert!(matches!(
            failure.source,
            LifecycleError::TestsFailed { code: 8 }
        ));
    }
}
