//! Run the full package test lifecycle.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use pkgtest_core::{
    BuildSettings, Recipe, SettingsError, TestContext, TestOutcome, lifecycle,
};
use pkgtest_runtime::CmakePackageTest;

use crate::error::CliError;

/// Arguments for the `run` command, mirroring the CLI flags.
pub struct RunArgs {
    pub root: Option<PathBuf>,
    pub settings_file: Option<PathBuf>,
    pub os: Option<String>,
    pub arch: Option<String>,
    pub compiler: Option<String>,
    pub build_type: Option<String>,
    pub source_dir: Option<PathBuf>,
    pub fresh: bool,
}

/// Execute the run command.
pub fn execute(args: RunArgs) -> Result<(), CliError> {
    let root = match &args.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    let recipe = Recipe::load(&root)?;
    let settings = assemble_settings(&args)?;

    let ctx = TestContext::new(&root, settings, recipe, args.source_dir.as_deref());
    debug!(
        settings = %ctx.settings,
        build_dir = %ctx.layout.build_dir.display(),
        "package test context assembled"
    );

    if args.fresh && ctx.layout.build_dir.exists() {
        std::fs::remove_dir_all(&ctx.layout.build_dir)?;
    }

    let runner = CmakePackageTest::with_default_cache()?;

    println!("Testing package: {} [{}]", ctx.settings, ctx.settings.build_id());
    let report = lifecycle::run(&runner, &ctx)?;

    match report.outcome {
        TestOutcome::Passed => {
            println!("✓ Package test passed ({:.1?})", report.elapsed);
        }
        TestOutcome::Skipped { reason } => {
            println!("- Test execution skipped: {reason}");
        }
    }
    Ok(())
}

/// Settings precedence: host defaults, then the settings file, then
/// individual flag overrides.
fn assemble_settings(args: &RunArgs) -> Result<BuildSettings, CliError> {
    let mut settings = match &args.settings_file {
        Some(path) => BuildSettings::load(path)?,
        None => BuildSettings::host_defaults(),
    };

    fn parse<T>(value: &Option<String>) -> Result<Option<T>, CliError>
    where
        T: FromStr<Err = SettingsError>,
    {
        value
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|e: SettingsError| CliError::Arguments(e.to_string()))
    }

    if let Some(os) = parse(&args.os)? {
        settings.os = os;
    }
    if let Some(arch) = parse(&args.arch)? {
        settings.arch = arch;
    }
    if let Some(compiler) = parse(&args.compiler)? {
        settings.compiler = compiler;
    }
    if let Some(build_type) = parse(&args.build_type)? {
        settings.build_type = build_type;
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgtest_core::{Arch, Os};

    fn bare_args() -> RunArgs {
        RunArgs {
            root: None,
            settings_file: None,
            os: None,
            arch: None,
            compiler: None,
            build_type: None,
            source_dir: None,
            fresh: false,
        }
    }

    #[test]
    fn flag_overrides_win_over_host_defaults() {
        let args = RunArgs {
            os: Some("linux".into()),
            arch: Some("armv7".into()),
            ..bare_args()
        };
        let settings = assemble_settings(&args).unwrap();
        assert_eq!(settings.os, Os::Linux);
        assert_eq!(settings.arch, Arch::Armv7);
    }

    #[test]
    fn bad_flag_values_map_to_the_usage_error() {
        let args = RunArgs {
            compiler: Some("icc".into()),
            ..bare_args()
        };
        let err = assemble_settings(&args).unwrap_err();
        assert!(matches!(err, CliError::Arguments(_)));
    }

    #[test]
    fn settings_file_is_honored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"os":"linux","compiler":"clang","build_type":"Debug","arch":"x86_64"}"#,
        )
        .unwrap();

        let args = RunArgs {
            settings_file: Some(path),
            ..bare_args()
        };
        let settings = assemble_settings(&args).unwrap();
        assert_eq!(settings.compiler, pkgtest_core::Compiler::Clang);
        assert_eq!(settings.build_type, pkgtest_core::BuildType::Debug);
    }
}
