//! Check external tool dependencies handler.
//!
//! Checks for the tools the runner shells out to and displays them in a
//! formatted, user-friendly way.

use anyhow::{Result, bail};

use pkgtest_core::ports::SystemProbePort;
use pkgtest_core::system::{Dependency, DependencyStatus};

// ANSI color codes for better UX
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Execute the check-deps command.
///
/// Returns an error (and a non-zero exit) if any required tool is missing.
pub fn execute(probe: &dyn SystemProbePort) -> Result<()> {
    println!("{BOLD}{BLUE}Checking build tools...{RESET}\n");

    let dependencies = probe.check_build_tools();

    println!("{BOLD}{:<16} {:<24} {:<40}{RESET}", "TOOL", "STATUS", "NOTES");
    println!("{}", "=".repeat(80));

    for dep in &dependencies {
        print_dependency(dep);
    }

    println!("{}", "=".repeat(80));

    let missing: Vec<&Dependency> = dependencies
        .iter()
        .filter(|d| d.required && matches!(d.status, DependencyStatus::Missing))
        .collect();

    if missing.is_empty() {
        println!("{GREEN}✓ All required tools are installed{RESET}");
        return Ok(());
    }

    println!("{RED}✗ Missing required tools:{RESET}");
    for dep in &missing {
        match &dep.install_hint {
            Some(hint) => println!("  {} — install with: {hint}", dep.name),
            None => println!("  {}", dep.name),
        }
    }
    bail!("{} required tool(s) missing", missing.len());
}

fn print_dependency(dep: &Dependency) {
    let (status, color) = match &dep.status {
        DependencyStatus::Present { version } => (format!("✓ {version}"), GREEN),
        DependencyStatus::Missing => ("✗ missing".to_string(), RED),
    };
    println!(
        "{:<16} {color}{:<24}{RESET} {:<40}",
        dep.name, status, dep.description
    );
}
