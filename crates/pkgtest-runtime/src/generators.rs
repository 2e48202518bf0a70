//! Generator-file emission.
//!
//! Before CMake ever runs, the selected [`Generator`]s are materialized into
//! the build directory so the test project can locate its build-time
//! requirements. Emission is a deterministic function of the resolved
//! package set; re-emitting overwrites in place.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::debug;

use pkgtest_core::{Generator, LifecycleError};

use crate::resolve::ResolvedPackage;

/// File emitted for [`Generator::CmakePaths`]; injected into every
/// configure via `-DCMAKE_PROJECT_INCLUDE`.
pub const PATHS_FILE: &str = "pkgtest_paths.cmake";

/// File emitted for [`Generator::Cmake`]; an opt-in include for projects
/// that want classic variable wiring.
pub const BUILDINFO_FILE: &str = "pkgtest_buildinfo.cmake";

const HEADER: &str = "# Generated by pkgtest - do not edit.\n";

/// Emit every selected generator file into the build directory.
///
/// Returns the paths written, in emission order.
pub fn emit(
    build_dir: &Path,
    generators: &[Generator],
    packages: &[ResolvedPackage],
) -> Result<Vec<PathBuf>, LifecycleError> {
    let mut written = Vec::new();
    for generator in generators {
        match generator {
            Generator::Cmake => {
                written.push(write_file(build_dir, BUILDINFO_FILE, &buildinfo(packages))?);
            }
            Generator::CmakePaths => {
                written.push(write_file(build_dir, PATHS_FILE, &paths(build_dir, packages))?);
            }
            Generator::CmakeFindPackage => {
                for package in packages {
                    let name = format!("Find{}.cmake", package.requirement.name);
                    written.push(write_file(build_dir, &name, &find_module(package))?);
                }
            }
        }
    }
    Ok(written)
}

fn write_file(build_dir: &Path, name: &str, content: &str) -> Result<PathBuf, LifecycleError> {
    let path = build_dir.join(name);
    std::fs::write(&path, content)?;
    debug!(file = %path.display(), "generator file written");
    Ok(path)
}

/// `pkgtest_buildinfo.cmake`: per-dependency variables plus aggregates and a
/// setup macro.
fn buildinfo(packages: &[ResolvedPackage]) -> String {
    let mut out = String::from(HEADER);
    let names: Vec<&str> = packages
        .iter()
        .map(|p| p.requirement.name.as_str())
        .collect();
    let _ = writeln!(out, "set(PKGTEST_DEPENDENCIES \"{}\")", names.join(";"));

    let mut all_includes = Vec::new();
    let mut all_libs = Vec::new();
    for package in packages {
        let prefix = var_prefix(&package.requirement.name);
        let includes = join_paths(&package.include_dirs);
        let libs = join_paths(&package.lib_dirs);
        let _ = writeln!(out, "set({prefix}_ROOT \"{}\")", cmake_path(&package.root));
        let _ = writeln!(out, "set({prefix}_INCLUDE_DIRS \"{includes}\")");
        let _ = writeln!(out, "set({prefix}_LIB_DIRS \"{libs}\")");
        all_includes.extend(package.include_dirs.iter().map(|p| cmake_path(p)));
        all_libs.extend(package.lib_dirs.iter().map(|p| cmake_path(p)));
    }
    let _ = writeln!(out, "set(PKGTEST_INCLUDE_DIRS \"{}\")", all_includes.join(";"));
    let _ = writeln!(out, "set(PKGTEST_LIB_DIRS \"{}\")", all_libs.join(";"));
    out.push_str(
        "macro(pkgtest_basic_setup)\n\
         \x20   include_directories(${PKGTEST_INCLUDE_DIRS})\n\
         \x20   link_directories(${PKGTEST_LIB_DIRS})\n\
         endmacro()\n",
    );
    out
}

/// `pkgtest_paths.cmake`: prefix and module path resolution.
fn paths(build_dir: &Path, packages: &[ResolvedPackage]) -> String {
    let mut out = String::from(HEADER);
    // The build dir itself first, so emitted Find modules win.
    let _ = writeln!(
        out,
        "list(PREPEND CMAKE_MODULE_PATH \"{}\")",
        cmake_path(build_dir)
    );
    for package in packages {
        let _ = writeln!(
            out,
            "list(PREPEND CMAKE_PREFIX_PATH \"{}\")",
            cmake_path(&package.root)
        );
    }
    out
}

/// `Find<Name>.cmake`: found variables and an imported INTERFACE target.
fn find_module(package: &ResolvedPackage) -> String {
    let name = &package.requirement.name;
    let prefix = var_prefix(name);
    let includes = join_paths(&package.include_dirs);
    let mut out = String::from(HEADER);
    let _ = writeln!(out, "set({prefix}_FOUND TRUE)");
    let _ = writeln!(out, "set({prefix}_INCLUDE_DIRS \"{includes}\")");
    let _ = writeln!(out, "if(NOT TARGET {name}::{name})");
    let _ = writeln!(out, "    add_library({name}::{name} INTERFACE IMPORTED)");
    let _ = writeln!(
        out,
        "    set_target_properties({name}::{name} PROPERTIES INTERFACE_INCLUDE_DIRECTORIES \"{includes}\")"
    );
    let _ = writeln!(out, "endif()");
    out
}

/// CMake wants forward slashes, even on Windows.
fn cmake_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| cmake_path(p))
        .collect::<Vec<_>>()
        .join(";")
}

/// Uppercase variable prefix for a package name (`catch2` → `CATCH2`).
fn var_prefix(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgtest_core::Requirement;

    fn package(name: &str) -> ResolvedPackage {
        ResolvedPackage {
            requirement: Requirement::new(name, "1.0"),
            root: PathBuf::from(format!("/cache/{name}/1.0")),
            include_dirs: vec![PathBuf::from(format!("/cache/{name}/1.0/include"))],
            lib_dirs: vec![],
        }
    }

    #[test]
    fn var_prefix_uppercases_and_sanitizes() {
        assert_eq!(var_prefix("catch2"), "CATCH2");
        assert_eq!(var_prefix("my-pkg"), "MY_PKG");
    }

    #[test]
    fn buildinfo_lists_dependencies_and_setup_macro() {
        let text = buildinfo(&[package("catch2"), package("fakeit")]);
        assert!(text.contains("set(PKGTEST_DEPENDENCIES \"catch2;fakeit\")"));
        assert!(text.contains("set(CATCH2_INCLUDE_DIRS \"/cache/catch2/1.0/include\")"));
        assert!(text.contains("macro(pkgtest_basic_setup)"));
    }

    #[test]
    fn find_module_defines_an_imported_target() {
        let text = find_module(&package("catch2"));
        assert!(text.contains("set(CATCH2_FOUND TRUE)"));
        assert!(text.contains("add_library(catch2::catch2 INTERFACE IMPORTED)"));
    }

    #[test]
    fn paths_file_prepends_prefix_paths_in_order() {
        let text = paths(Path::new("/pkg/build/abc"), &[package("catch2")]);
        assert!(text.contains("list(PREPEND CMAKE_MODULE_PATH \"/pkg/build/abc\")"));
        assert!(text.contains("list(PREPEND CMAKE_PREFIX_PATH \"/cache/catch2/1.0\")"));
    }
}
