//! Generic command existence and version extraction.
//!
//! These functions check if tools exist and extract their version strings.

use std::process::Command;

/// Get the version of a command by running it with `--version`.
fn get_command_version(cmd: &str, version_flag: &str) -> Option<String> {
    let output = Command::new(cmd).arg(version_flag).output().ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    // Try stdout first, fall back to stderr (some tools output to stderr)
    let text = if stdout.trim().is_empty() { stderr } else { stdout };

    text.lines().next().map(|s| s.trim().to_string())
}

/// Get cmake version.
pub(crate) fn get_cmake_version() -> Option<String> {
    let output = get_command_version("cmake", "--version")?;
    // "cmake version 3.28.1" -> "3.28.1"
    output.split_whitespace().nth(2).map(ToString::to_string)
}

/// Get ctest version.
pub(crate) fn get_ctest_version() -> Option<String> {
    let output = get_command_version("ctest", "--version")?;
    // "ctest version 3.28.1" -> "3.28.1"
    output.split_whitespace().nth(2).map(ToString::to_string)
}

/// Probe for a working C++ compiler, in platform preference order.
///
/// Returns the tool name and its reported version line.
pub(crate) fn get_cpp_compiler() -> Option<(String, String)> {
    let candidates: &[&str] = if cfg!(target_os = "windows") {
        &["cl", "g++", "clang++"]
    } else if cfg!(target_os = "macos") {
        &["clang++", "g++"]
    } else {
        &["g++", "clang++"]
    };

    for candidate in candidates {
        if let Some(version) = get_command_version(candidate, "--version") {
            return Some(((*candidate).to_string(), version));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonexistent_command_has_no_version() {
        assert!(get_command_version("definitely-not-a-real-tool-12345", "--version").is_none());
    }
}
