//! Cpanfile discovery.
//!
//! Resolves the user's optional path argument to exactly one cpanfile. The
//! current directory's cpanfile is always tried last, so a directory without
//! a cpanfile still resolves when the working directory has one.

use std::path::{Path, PathBuf};

use crate::error::{InstallerError, Result};

/// File name every manifest must carry.
pub const MANIFEST_FILE_NAME: &str = "cpanfile";

/// Where the manifest was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestLocation {
    /// Path to the cpanfile.
    pub path: PathBuf,
    /// True when the specified location had no cpanfile and the current
    /// directory's was used instead.
    pub fallback: bool,
}

/// Locate the cpanfile for this run.
///
/// `specified` is the positional argument, if any; relative paths are
/// resolved against `cwd`.
pub fn locate(specified: Option<&Path>, cwd: &Path) -> Result<ManifestLocation> {
    let mut candidates = Vec::new();

    if let Some(path) = specified {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };

        if !path.exists() {
            return Err(InstallerError::PathNotFound { path });
        }

        if path.is_dir() {
            tracing::debug!("Checking specified directory: {}", path.display());
            candidates.push(path.join(MANIFEST_FILE_NAME));
        } else if path.file_name().is_some_and(|n| n == MANIFEST_FILE_NAME) {
            tracing::debug!("Using specified cpanfile: {}", path.display());
            candidates.push(path);
        } else {
            return Err(InstallerError::InvalidManifestName { path });
        }
    }

    let current = cwd.join(MANIFEST_FILE_NAME);
    if !candidates.contains(&current) {
        candidates.push(current);
    }

    for (index, candidate) in candidates.iter().enumerate() {
        if candidate.is_file() {
            return Ok(ManifestLocation {
                path: candidate.clone(),
                fallback: specified.is_some() && index > 0,
            });
        }
    }

    Err(InstallerError::ManifestNotFound {
        searched: candidates,
    })
}
