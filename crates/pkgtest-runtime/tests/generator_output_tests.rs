//! Integration tests for generator-file emission.

use std::fs;

use tempfile::tempdir;

use pkgtest_core::{Generator, Requirement};
use pkgtest_runtime::{PackageCache, generators};

fn seeded_cache(root: &std::path::Path) -> PackageCache {
    for (name, version) in [("catch2", "2.9.2"), ("fakeit", "2.0.9")] {
        fs::create_dir_all(root.join(name).join(version).join("include")).unwrap();
    }
    PackageCache::at(root.to_path_buf())
}

#[test]
fn emit_writes_the_selected_files_only() {
    let cache_dir = tempdir().unwrap();
    let cache = seeded_cache(cache_dir.path());
    let resolved = cache
        .resolve_all(&[Requirement::new("catch2", "2.9.2")])
        .unwrap();

    let build = tempdir().unwrap();
    let written = generators::emit(build.path(), &[Generator::CmakePaths], &resolved).unwrap();

    assert_eq!(written, vec![build.path().join(generators::PATHS_FILE)]);
    assert!(!build.path().join(generators::BUILDINFO_FILE).exists());
    assert!(!build.path().join("Findcatch2.cmake").exists());
}

#[test]
fn full_generator_set_covers_every_dependency() {
    let cache_dir = tempdir().unwrap();
    let cache = seeded_cache(cache_dir.path());
    let resolved = cache
        .resolve_all(&[
            Requirement::new("catch2", "2.9.2"),
            Requirement::new("fakeit", "2.0.9"),
        ])
        .unwrap();

    let build = tempdir().unwrap();
    let written = generators::emit(build.path(), &Generator::ALL, &resolved).unwrap();

    // buildinfo + paths + one find module per dependency
    assert_eq!(written.len(), 4);
    assert!(build.path().join("Findcatch2.cmake").is_file());
    assert!(build.path().join("Findfakeit.cmake").is_file());

    let find = fs::read_to_string(build.path().join("Findcatch2.cmake")).unwrap();
    assert!(find.contains("set(CATCH2_FOUND TRUE)"));
    assert!(find.contains("add_library(catch2::catch2 INTERFACE IMPORTED)"));

    let paths = fs::read_to_string(build.path().join(generators::PATHS_FILE)).unwrap();
    assert!(paths.contains("CMAKE_PREFIX_PATH"));
    assert!(paths.contains("catch2/2.9.2"));

    let buildinfo = fs::read_to_string(build.path().join(generators::BUILDINFO_FILE)).unwrap();
    assert!(buildinfo.contains("set(PKGTEST_DEPENDENCIES \"catch2;fakeit\")"));
    assert!(buildinfo.contains("pkgtest_basic_setup"));
}

#[test]
fn emission_is_deterministic_and_overwrites_in_place() {
    let cache_dir = tempdir().unwrap();
    let cache = seeded_cache(cache_dir.path());
    let resolved = cache
        .resolve_all(&[Requirement::new("catch2", "2.9.2")])
        .unwrap();

    let build = tempdir().unwrap();
    generators::emit(build.path(), &Generator::ALL, &resolved).unwrap();
    let first = fs::read_to_string(build.path().join(generators::BUILDINFO_FILE)).unwrap();

    generators::emit(build.path(), &Generator::ALL, &resolved).unwrap();
    let second = fs::read_to_string(build.path().join(generators::BUILDINFO_FILE)).unwrap();

    assert_eq!(first, second);
}
