//! Test execution through ctest.
//!
//! Output-on-failure is always on: when a test case fails, its full captured
//! output is surfaced rather than suppressed. Stdio is inherited so ctest's
//! own reporting reaches the terminal unmodified.

use std::process::Command;

use tracing::{debug, info};

use pkgtest_core::{LifecycleError, TestContext};

/// Run the compiled test binary via ctest in the build directory.
///
/// Propagates a non-zero ctest exit as [`LifecycleError::TestsFailed`].
pub fn run_tests(ctx: &TestContext) -> Result<(), LifecycleError> {
    let config = ctx.settings.build_type.cmake_name();
    debug!(build_dir = %ctx.layout.build_dir.display(), config, "running ctest");

    // TODO: parallel ctest runs have been flaky; keep the run serial until
    // the cause is found.
    let status = Command::new("ctest")
        .current_dir(&ctx.layout.build_dir)
        .args(["--output-on-failure", "-C", config, "-j", "1"])
        .status()?;

    if !status.success() {
        return Err(LifecycleError::TestsFailed {
            code: status.code().unwrap_or(-1),
        });
    }
    info!("all test cases passed");
    Ok(())
}
