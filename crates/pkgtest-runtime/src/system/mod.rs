//! System probe implementation for pkgtest-runtime.
//!
//! Provides [`DefaultSystemProbe`], the `SystemProbePort` implementation
//! backing the `check-deps` command. It performs active probing via command
//! execution; the pure `Dependency` types live in pkgtest-core.

mod commands;

use pkgtest_core::ports::SystemProbePort;
use pkgtest_core::system::{Dependency, DependencyStatus};

use commands::{get_cmake_version, get_cpp_compiler, get_ctest_version};

fn status_from(version: Option<String>) -> DependencyStatus {
    version.map_or(DependencyStatus::Missing, |v| DependencyStatus::Present {
        version: v,
    })
}

/// Default implementation of `SystemProbePort`.
///
/// Constructed in the CLI's main and passed to handlers that need to know
/// whether the external toolchain is usable.
pub struct DefaultSystemProbe;

impl DefaultSystemProbe {
    /// Create a new default system probe.
    pub const fn new() -> Self {
        Self
    }
}

impl Default for DefaultSystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemProbePort for DefaultSystemProbe {
    fn check_build_tools(&self) -> Vec<Dependency> {
        let install_cmake = if cfg!(target_os = "macos") {
            "brew install cmake"
        } else if cfg!(target_os = "windows") {
            "https://cmake.org/download/"
        } else {
            "apt install cmake"
        };

        vec![
            Dependency::required("cmake", "Configures and builds the test project")
                .with_hint(install_cmake)
                .with_status(status_from(get_cmake_version())),
            Dependency::required("ctest", "Runs the compiled test binary")
                .with_hint("ships with CMake")
                .with_status(status_from(get_ctest_version())),
            Dependency::required("c++ compiler", "Compiles the test project")
                .with_hint(if cfg!(target_os = "linux") {
                    "apt install build-essential"
                } else if cfg!(target_os = "macos") {
                    "xcode-select --install"
                } else {
                    "Visual Studio Build Tools (C++ workload)"
                })
                .with_status(status_from(
                    get_cpp_compiler().map(|(name, version)| format!("{name} ({version})")),
                )),
        ]
    }
}
