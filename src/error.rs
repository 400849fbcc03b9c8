//! Error types for installer operations.
//!
//! This module defines [`InstallerError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Run-level variants (manifest, detection, privilege) abort the run
//! - Per-module variants are recorded against that module and the run continues
//! - Use `anyhow::Error` (via `InstallerError::Other`) for unexpected errors

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for installer operations.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The path given on the command line does not exist.
    #[error("Specified path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    /// The path given on the command line is a file not named `cpanfile`.
    #[error("Specified file is not named 'cpanfile': {path}")]
    InvalidManifestName { path: PathBuf },

    /// No cpanfile exists at any candidate location.
    #[error("cpanfile not found in specified or current directory (searched: {})", display_paths(.searched))]
    ManifestNotFound { searched: Vec<PathBuf> },

    /// The cpanfile declares no modules.
    #[error("No modules found in cpanfile: {path}")]
    InvalidManifest { path: PathBuf },

    /// None of the detection strategies found a package manager.
    #[error("Could not detect a supported package manager")]
    NoPackageManagerDetected,

    /// Root privileges are needed for the requested operation.
    #[error("This operation must be run as root or with sudo: {operation}")]
    PrivilegeRequired { operation: String },

    /// The user declined the installation plan.
    #[error("Installation cancelled by user")]
    Cancelled,

    /// A command could not be spawned or waited on.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A command exceeded its deadline and was killed.
    #[error("Command timed out after {after:?}: {command}")]
    Timeout { command: String, after: Duration },

    /// The native package manager could not install a package.
    #[error("Failed to install package '{package}': {message}")]
    PackageInstallFailed { package: String, message: String },

    /// The module registry could not be queried.
    #[error("Registry lookup failed for '{module}': {message}")]
    RegistryLookupFailed { module: String, message: String },

    /// Installing a module through the registry installer failed.
    #[error("Registry install failed for '{module}': {message}")]
    RegistryInstallFailed { module: String, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl InstallerError {
    /// Run-level stops that are reported as warnings rather than errors:
    /// a cpanfile with nothing to install, or a declined plan.
    pub fn is_soft_stop(&self) -> bool {
        matches!(self, Self::InvalidManifest { .. } | Self::Cancelled)
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for installer operations.
pub type Result<T> = std::result::Result<T, InstallerError>;
