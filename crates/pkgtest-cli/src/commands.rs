//! Main commands enum and primary subcommands.
//!
//! Setting overrides are accepted as plain strings and parsed in the
//! handlers so parse errors map to the usage exit code.

use std::path::PathBuf;

use clap::Subcommand;

/// Available commands for the package test runner.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the full package test lifecycle (configure, build, test)
    Run {
        /// Package-test root containing pkgtest.json (defaults to the
        /// current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// JSON settings record supplied by a host package manager
        #[arg(long)]
        settings_file: Option<PathBuf>,

        /// Target operating system: linux, macos, windows
        #[arg(long)]
        os: Option<String>,

        /// Target architecture: x86_64, x86, armv7, armv8
        #[arg(long)]
        arch: Option<String>,

        /// Compiler family: gcc, clang, apple-clang, msvc
        #[arg(long)]
        compiler: Option<String>,

        /// Build configuration: Debug, Release, RelWithDebInfo, MinSizeRel
        #[arg(long)]
        build_type: Option<String>,

        /// Override the test-sources directory
        #[arg(long)]
        source_dir: Option<PathBuf>,

        /// Delete the build directory before configuring
        #[arg(long)]
        fresh: bool,
    },

    /// Check the external tools the runner shells out to
    CheckDeps,

    /// Show resolved paths for pkgtest directories
    Paths {
        /// Package-test root to show the build layout for
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Maintain the local package cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

/// Cache maintenance subcommands.
#[derive(Subcommand)]
pub enum CacheCommand {
    /// Copy a prepared package directory into the cache
    Add {
        /// Package reference in name/version form (e.g. "catch2/2.9.2")
        reference: String,
        /// Directory holding the package layout (include/, lib/)
        dir: PathBuf,
    },

    /// List cached packages
    List,
}
