//! CLI entry point - the composition root.
//!
//! This is the only place where the runtime adapter is wired in. Command
//! dispatch routes to handlers; the process exit code reflects the aggregate
//! package test result (0 = all passed or skipped due to cross-building).

use std::process::ExitCode;

use clap::Parser;

use pkgtest_cli::{CacheCommand, Cli, CliError, Commands, handlers};
use pkgtest_runtime::DefaultSystemProbe;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; --verbose forces debug level
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    // No command provided - show help
    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command()
            .print_help()
            .map_err(|e| CliError::Io(e.to_string()))?;
        return Ok(());
    };

    match command {
        Commands::Run {
            root,
            settings_file,
            os,
            arch,
            compiler,
            build_type,
            source_dir,
            fresh,
        } => {
            let args = handlers::run::RunArgs {
                root,
                settings_file,
                os,
                arch,
                compiler,
                build_type,
                source_dir,
                fresh,
            };
            handlers::run::execute(args)
        }
        Commands::CheckDeps => {
            let probe = DefaultSystemProbe::new();
            handlers::check_deps::execute(&probe).map_err(|e| CliError::Failed(e.to_string()))
        }
        Commands::Paths { root } => handlers::paths::execute(root.as_deref())
            .map_err(|e| CliError::Failed(e.to_string())),
        Commands::Cache { command } => match command {
            CacheCommand::Add { reference, dir } => handlers::cache::add(&reference, &dir),
            CacheCommand::List => handlers::cache::list(),
        },
    }
}
