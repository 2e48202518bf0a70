//! System dependency types.
//!
//! Pure domain types describing the external tools a package test needs;
//! active probing lives behind [`crate::ports::SystemProbePort`].

/// Represents the status of a system dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyStatus {
    /// Dependency is installed and available.
    Present { version: String },
    /// Dependency is missing.
    Missing,
}

/// Information about a system dependency.
#[derive(Debug, Clone)]
pub struct Dependency {
    /// Name of the tool (e.g., "cmake", "ctest").
    pub name: String,
    /// Current status of the dependency.
    pub status: DependencyStatus,
    /// Description of what this dependency is used for.
    pub description: String,
    /// Whether this dependency is required or optional.
    pub required: bool,
    /// Installation instructions or hints.
    pub install_hint: Option<String>,
}

impl Dependency {
    /// Create a new required dependency.
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: DependencyStatus::Missing,
            description: description.into(),
            required: true,
            install_hint: None,
        }
    }

    /// Create a new optional dependency.
    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: DependencyStatus::Missing,
            description: description.into(),
            required: false,
            install_hint: None,
        }
    }

    /// Set installation hint.
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.install_hint = Some(hint.into());
        self
    }

    /// Set the status of this dependency.
    #[must_use]
    pub fn with_status(mut self, status: DependencyStatus) -> Self {
        self.status = status;
        self
    }
}
