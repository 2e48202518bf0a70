//! The concrete package test: CMake project + ctest binary.

use tracing::{debug, info};

use pkgtest_core::paths::ensure_directory;
use pkgtest_core::{LifecycleError, PackageTest, TestContext, TestOutcome};

use crate::resolve::PackageCache;
use crate::{cmake, ctest, generators};

/// The one [`PackageTest`] implementation: resolves requirements from the
/// local cache, drives CMake against the checked-in test sources, and runs
/// the produced binary through ctest.
pub struct CmakePackageTest {
    cache: PackageCache,
}

impl CmakePackageTest {
    /// Build a runner over an explicit package cache.
    pub const fn new(cache: PackageCache) -> Self {
        Self { cache }
    }

    /// Build a runner over the default cache location.
    pub fn with_default_cache() -> Result<Self, LifecycleError> {
        Ok(Self::new(PackageCache::open_default()?))
    }
}

impl PackageTest for CmakePackageTest {
    fn configure(&self, ctx: &TestContext) -> Result<(), LifecycleError> {
        let resolved = self.cache.resolve_all(&ctx.recipe.requires)?;
        ensure_directory(&ctx.layout.build_dir)?;
        let written = generators::emit(&ctx.layout.build_dir, &ctx.recipe.generators, &resolved)?;
        debug!(
            requirements = ctx.recipe.requires.len(),
            files = written.len(),
            "configured"
        );
        Ok(())
    }

    fn build(&self, ctx: &TestContext) -> Result<(), LifecycleError> {
        cmake::configure(ctx)?;
        cmake::build(ctx)
    }

    fn imports(&self, _ctx: &TestContext) -> Result<(), LifecycleError> {
        // Nothing to copy: the test binary links the package statically.
        debug!("no runtime artifacts to import");
        Ok(())
    }

    fn test(&self, ctx: &TestContext) -> Result<TestOutcome, LifecycleError> {
        if ctx.settings.cross_building() {
            let reason = format!(
                "cross-building for {}/{}; the binary cannot run here",
                ctx.settings.os, ctx.settings.arch
            );
            info!(reason = %reason, "skipping test execution");
            return Ok(TestOutcome::Skipped { reason });
        }
        ctest::run_tests(ctx)?;
        Ok(TestOutcome::Passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgtest_core::{Arch, BuildSettings, Os, Recipe};
    use std::path::{Path, PathBuf};

    fn cross_context() -> TestContext {
        // Flip the OS so the settings are guaranteed cross on any host.
        let os = match Os::host() {
            Os::Linux => Os::Windows,
            _ => Os::Linux,
        };
        let settings = BuildSettings {
            os,
            arch: Arch::host(),
            ..BuildSettings::host_defaults()
        };
        TestContext::new(Path::new("/pkg"), settings, Recipe::empty(), None)
    }

    #[test]
    fn cross_settings_skip_test_execution() {
        let runner = CmakePackageTest::new(PackageCache::at(PathBuf::from("/nonexistent")));
        let outcome = runner.test(&cross_context()).unwrap();
        assert!(matches!(outcome, TestOutcome::Skipped { .. }));
    }

    #[test]
    fn imports_is_a_no_op() {
        let runner = CmakePackageTest::new(PackageCache::at(PathBuf::from("/nonexistent")));
        runner.imports(&cross_context()).unwrap();
    }
}
