//! Build settings domain types.
//!
//! A [`BuildSettings`] record is supplied once per invocation by whatever is
//! driving the test (a package manager host, CI, or a developer at the
//! prompt) and is read-only from the runner's perspective. The same record
//! always produces the same build identifier, which names the build
//! directory under `build/`.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors produced while parsing or loading build settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Unrecognized operating system name.
    #[error("unknown operating system '{0}' (expected linux, macos or windows)")]
    UnknownOs(String),

    /// Unrecognized architecture name.
    #[error("unknown architecture '{0}' (expected x86_64, x86, armv7 or armv8)")]
    UnknownArch(String),

    /// Unrecognized compiler name.
    #[error("unknown compiler '{0}' (expected gcc, clang, apple-clang or msvc)")]
    UnknownCompiler(String),

    /// Unrecognized build type name.
    #[error("unknown build type '{0}' (expected Debug, Release, RelWithDebInfo or MinSizeRel)")]
    UnknownBuildType(String),

    /// Settings file could not be read.
    #[error("failed to read settings file {path}: {reason}")]
    FileRead { path: String, reason: String },

    /// Settings file could not be parsed.
    #[error("failed to parse settings file {path}: {reason}")]
    FileParse { path: String, reason: String },
}

/// Target operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    Linux,
    Macos,
    Windows,
}

impl Os {
    /// The operating system this binary was compiled for.
    pub const fn host() -> Self {
        if cfg!(target_os = "macos") {
            Self::Macos
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    /// The `CMAKE_SYSTEM_NAME` value for cross configuration.
    pub const fn cmake_system_name(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::Macos => "Darwin",
            Self::Windows => "Windows",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::Windows => "windows",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Os {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linux" => Ok(Self::Linux),
            "macos" => Ok(Self::Macos),
            "windows" => Ok(Self::Windows),
            other => Err(SettingsError::UnknownOs(other.to_string())),
        }
    }
}

/// Target processor architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    X86_64,
    X86,
    Armv7,
    Armv8,
}

impl Arch {
    /// The architecture this binary was compiled for.
    pub const fn host() -> Self {
        if cfg!(target_arch = "x86_64") {
            Self::X86_64
        } else if cfg!(target_arch = "x86") {
            Self::X86
        } else if cfg!(target_arch = "arm") {
            Self::Armv7
        } else if cfg!(target_arch = "aarch64") {
            Self::Armv8
        } else {
            // Unrecognized targets are treated as the common case so the
            // cross check errs toward skipping test execution.
            Self::X86_64
        }
    }

    /// Whether a binary built for this architecture can execute on `host`.
    ///
    /// 32-bit x86 binaries run on x86_64 hosts (multilib). Everything else
    /// requires an exact match; notably armv7-on-armv8 is treated as cross
    /// because 32-bit support is not guaranteed on arm64 hosts.
    pub fn runs_on(self, host: Self) -> bool {
        self == host || (self == Self::X86 && host == Self::X86_64)
    }

    /// The `CMAKE_SYSTEM_PROCESSOR` value for cross configuration.
    pub const fn cmake_processor(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::X86 => "i686",
            Self::Armv7 => "armv7",
            Self::Armv8 => "aarch64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X86_64 => "x86_64",
            Self::X86 => "x86",
            Self::Armv7 => "armv7",
            Self::Armv8 => "armv8",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Arch {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x86_64" => Ok(Self::X86_64),
            "x86" => Ok(Self::X86),
            "armv7" => Ok(Self::Armv7),
            "armv8" | "aarch64" => Ok(Self::Armv8),
            other => Err(SettingsError::UnknownArch(other.to_string())),
        }
    }
}

/// Compiler family used for the test project build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Compiler {
    Gcc,
    Clang,
    AppleClang,
    Msvc,
}

impl Compiler {
    /// The conventional default compiler for an operating system.
    pub const fn default_for(os: Os) -> Self {
        match os {
            Os::Linux => Self::Gcc,
            Os::Macos => Self::AppleClang,
            Os::Windows => Self::Msvc,
        }
    }

    /// The `CC`/`CXX` executable pair to export, when one applies.
    ///
    /// MSVC is selected by CMake's generator machinery rather than
    /// environment variables, so it maps to `None`.
    pub const fn cc_cxx(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Gcc => Some(("gcc", "g++")),
            Self::Clang | Self::AppleClang => Some(("clang", "clang++")),
            Self::Msvc => None,
        }
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gcc => "gcc",
            Self::Clang => "clang",
            Self::AppleClang => "apple-clang",
            Self::Msvc => "msvc",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Compiler {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gcc" => Ok(Self::Gcc),
            "clang" => Ok(Self::Clang),
            "apple-clang" => Ok(Self::AppleClang),
            "msvc" => Ok(Self::Msvc),
            other => Err(SettingsError::UnknownCompiler(other.to_string())),
        }
    }
}

/// CMake build configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildType {
    Debug,
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    /// The `CMAKE_BUILD_TYPE` / `ctest -C` configuration name.
    pub const fn cmake_name(self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::RelWithDebInfo => "RelWithDebInfo",
            Self::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cmake_name())
    }
}

impl FromStr for BuildType {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Debug" => Ok(Self::Debug),
            "Release" => Ok(Self::Release),
            "RelWithDebInfo" => Ok(Self::RelWithDebInfo),
            "MinSizeRel" => Ok(Self::MinSizeRel),
            other => Err(SettingsError::UnknownBuildType(other.to_string())),
        }
    }
}

/// Immutable build settings for one package test invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Target operating system.
    pub os: Os,
    /// Compiler family.
    pub compiler: Compiler,
    /// CMake build configuration.
    pub build_type: BuildType,
    /// Target architecture.
    pub arch: Arch,
}

impl BuildSettings {
    /// Settings matching the host platform with a Release configuration.
    pub fn host_defaults() -> Self {
        let os = Os::host();
        Self {
            os,
            compiler: Compiler::default_for(os),
            build_type: BuildType::Release,
            arch: Arch::host(),
        }
    }

    /// Load a settings record from a JSON file, as supplied by a host
    /// package manager.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|e| SettingsError::FileRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| SettingsError::FileParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Canonical single-line form, used for the build identifier and logs.
    pub fn canonical(&self) -> String {
        format!(
            "arch={};build_type={};compiler={};os={}",
            self.arch, self.build_type, self.compiler, self.os
        )
    }

    /// Stable identifier for this settings record.
    ///
    /// Derived from a SHA-256 digest of the canonical form, truncated to 16
    /// hex characters. Identical settings always produce the identical id,
    /// which keeps repeated invocations pointed at the same build directory.
    pub fn build_id(&self) -> String {
        use std::fmt::Write as _;
        let digest = Sha256::digest(self.canonical().as_bytes());
        let mut id = String::with_capacity(16);
        for byte in digest.iter().take(8) {
            let _ = write!(id, "{byte:02x}");
        }
        id
    }

    /// Whether these settings target something the given host cannot
    /// execute. Pure so it can be checked for arbitrary host/target pairs.
    pub fn is_cross_for(&self, host_os: Os, host_arch: Arch) -> bool {
        self.os != host_os || !self.arch.runs_on(host_arch)
    }

    /// Whether these settings are cross-building relative to this machine.
    pub fn cross_building(&self) -> bool {
        self.is_cross_for(Os::host(), Arch::host())
    }
}

impl fmt::Display for BuildSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} {} ({})",
            self.os, self.arch, self.build_type, self.compiler
        )
    }
}
