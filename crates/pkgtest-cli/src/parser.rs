//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface definition for the package test runner.
///
/// This is the top-level parser that handles global options and dispatches
/// to subcommands.
#[derive(Parser)]
#[command(name = "pkgtest")]
#[command(about = "Build and run a consumer test against a native package")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        // Verify the CLI parser can be constructed
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from(["pkgtest", "--verbose", "check-deps"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::CheckDeps)));
    }

    #[test]
    fn run_accepts_setting_overrides() {
        let cli = Cli::parse_from([
            "pkgtest",
            "run",
            "--os",
            "linux",
            "--arch",
            "armv7",
            "--build-type",
            "Release",
        ]);
        let Some(Commands::Run { os, arch, build_type, .. }) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(os.as_deref(), Some("linux"));
        assert_eq!(arch.as_deref(), Some("armv7"));
        assert_eq!(build_type.as_deref(), Some("Release"));
    }

    #[test]
    fn cache_add_takes_reference_and_directory() {
        let cli = Cli::parse_from(["pkgtest", "cache", "add", "catch2/2.9.2", "/tmp/catch2"]);
        let Some(Commands::Cache { command }) = cli.command else {
            panic!("expected cache command");
        };
        match command {
            crate::commands::CacheCommand::Add { reference, dir } => {
                assert_eq!(reference, "catch2/2.9.2");
                assert_eq!(dir, std::path::PathBuf::from("/tmp/catch2"));
            }
            crate::commands::CacheCommand::List => panic!("expected cache add"),
        }
    }
}
