//! CMake configure and build orchestration.
//!
//! Both steps spawn `cmake` with piped stdio, drain stdout/stderr on reader
//! threads through an mpsc channel, and surface lines through an indicatif
//! progress display. A non-zero exit from either step is fatal and never
//! retried.

mod progress;

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc;
use std::thread;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use pkgtest_core::paths::ensure_directory;
use pkgtest_core::{LifecycleError, TestContext};

use crate::generators::PATHS_FILE;
use progress::parse_build_progress;

/// Run the CMake configuration step against the test sources.
pub fn configure(ctx: &TestContext) -> Result<(), LifecycleError> {
    preflight(&ctx.layout.source_dir)?;
    ensure_directory(&ctx.layout.build_dir)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message("Configuring with CMake...");

    let mut cmd = Command::new("cmake");
    cmd.arg("-S")
        .arg(&ctx.layout.source_dir)
        .arg("-B")
        .arg(&ctx.layout.build_dir)
        .arg(format!(
            "-DCMAKE_BUILD_TYPE={}",
            ctx.settings.build_type.cmake_name()
        ));

    // Inject path resolution into the project without boilerplate includes.
    if ctx.recipe.generators.contains(&pkgtest_core::Generator::CmakePaths) {
        let paths_file = ctx.layout.build_dir.join(PATHS_FILE);
        cmd.arg(format!("-DCMAKE_PROJECT_INCLUDE={}", paths_file.display()));
    }

    // Only set CC/CXX when the user has not already chosen; if either is
    // set we respect it and let CMake handle pairing.
    let cc_set = std::env::var("CC").is_ok();
    let cxx_set = std::env::var("CXX").is_ok();
    if !cc_set
        && !cxx_set
        && let Some((cc, cxx)) = ctx.settings.compiler.cc_cxx()
    {
        cmd.env("CC", cc).env("CXX", cxx);
    }

    // The build still runs when cross-building; only test execution is
    // skipped later. Setting CMAKE_SYSTEM_NAME puts CMake in cross mode.
    if ctx.settings.cross_building() {
        cmd.arg(format!(
            "-DCMAKE_SYSTEM_NAME={}",
            ctx.settings.os.cmake_system_name()
        ));
        cmd.arg(format!(
            "-DCMAKE_SYSTEM_PROCESSOR={}",
            ctx.settings.arch.cmake_processor()
        ));
    }

    debug!(source = %ctx.layout.source_dir.display(), build = %ctx.layout.build_dir.display(), "cmake configure");

    let status = run_streamed(&mut cmd, |line| {
        if !line.trim().is_empty() {
            pb.println(line);
        }
        pb.tick();
    })?;

    pb.finish_and_clear();

    if !status.success() {
        return Err(LifecycleError::ConfigureFailed(format!(
            "cmake exited with code {}",
            status.code().unwrap_or(-1)
        )));
    }
    Ok(())
}

/// Run the CMake build step with progress tracking.
pub fn build(ctx: &TestContext) -> Result<(), LifecycleError> {
    let jobs = build_parallelism();
    debug!(jobs, "cmake build");

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let mut cmd = Command::new("cmake");
    cmd.arg("--build")
        .arg(&ctx.layout.build_dir)
        .args(["--config", ctx.settings.build_type.cmake_name()])
        .args(["-j", &jobs.to_string()]);

    let mut last_progress = 0;
    let status = run_streamed(&mut cmd, |line| {
        pb.tick();

        if let Some((current, total)) = parse_build_progress(line)
            && current > last_progress
        {
            pb.set_length(total as u64);
            pb.set_position(current as u64);
            last_progress = current;
        }

        // Show build milestones, errors and warnings; swallow the rest.
        let lower = line.to_ascii_lowercase();
        if line.contains("Building")
            || line.contains("Linking")
            || lower.contains("error")
            || lower.contains("warning:")
            || lower.contains("fatal")
            || lower.contains("undefined reference")
        {
            pb.println(line);
        }
    })?;

    pb.finish_and_clear();

    if !status.success() {
        return Err(LifecycleError::BuildFailed(format!(
            "cmake --build exited with code {}",
            status.code().unwrap_or(-1)
        )));
    }
    Ok(())
}

/// The sources path is load-bearing: fail before spawning anything if it
/// does not hold a CMake project.
fn preflight(source_dir: &Path) -> Result<(), LifecycleError> {
    if source_dir.join("CMakeLists.txt").is_file() {
        Ok(())
    } else {
        Err(LifecycleError::SourcesMissing {
            path: source_dir.to_path_buf(),
        })
    }
}

/// Build parallelism: `CMAKE_BUILD_PARALLEL_LEVEL` override, else all cores.
fn build_parallelism() -> usize {
    if let Ok(value) = std::env::var("CMAKE_BUILD_PARALLEL_LEVEL")
        && let Ok(n) = value.parse::<usize>()
        && n > 0
    {
        return n;
    }
    num_cpus::get()
}

/// Spawn a command with piped stdio and feed every output line (stdout and
/// stderr interleaved) to `on_line`. Returns once the process has exited and
/// both pipes are drained.
fn run_streamed(
    cmd: &mut Command,
    mut on_line: impl FnMut(&str),
) -> std::io::Result<ExitStatus> {
    let mut child = cmd.stdout(Stdio::piped()).stderr(Stdio::piped()).spawn()?;

    let (tx, rx) = mpsc::channel();
    let tx_err = tx.clone();

    // stdout/stderr arrive on their own reader threads; the channel closes
    // when both hit EOF, which happens at process exit.
    let stdout = child.stdout.take();
    let stdout_reader = thread::spawn(move || {
        if let Some(stdout) = stdout {
            for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                if tx.send(line).is_err() {
                    break;
                }
            }
        }
    });
    let stderr = child.stderr.take();
    let stderr_reader = thread::spawn(move || {
        if let Some(stderr) = stderr {
            for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                if tx_err.send(line).is_err() {
                    break;
                }
            }
        }
    });

    for line in rx {
        on_line(&line);
    }

    let _ = stdout_reader.join();
    let _ = stderr_reader.join();
    child.wait()
}
