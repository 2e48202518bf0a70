//! System probe port for build-tool detection.
//!
//! Core owns the trait and the [`Dependency`] types; the active probing
//! (command execution, version parsing) lives in the runtime adapter and is
//! injected by the CLI at its composition root.

use crate::system::Dependency;

/// Port for probing the external tools a package test shells out to.
pub trait SystemProbePort: Send + Sync {
    /// Check every tool the runner may invoke and report its status.
    fn check_build_tools(&self) -> Vec<Dependency>;
}
