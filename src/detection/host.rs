//! Host capabilities used by detection and resolution.
//!
//! Everything the installer needs to know about the machine it runs on goes
//! through [`Host`], so detection logic can be exercised with a fake host.

use std::path::{Path, PathBuf};

/// Location of the OS identification file.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Facts about the machine the installer runs on.
pub trait Host {
    /// Contents of the OS identification file, if readable.
    fn os_release(&self) -> Option<String>;

    /// Whether the kernel is Darwin.
    fn is_darwin(&self) -> bool;

    /// Resolve an executable on the search path.
    fn find_executable(&self, name: &str) -> Option<PathBuf>;

    /// Whether the process runs with root privileges.
    fn is_elevated(&self) -> bool;
}

/// The real host.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl Host for SystemHost {
    fn os_release(&self) -> Option<String> {
        std::fs::read_to_string(OS_RELEASE_PATH).ok()
    }

    fn is_darwin(&self) -> bool {
        crate::shell::is_darwin()
    }

    fn find_executable(&self, name: &str) -> Option<PathBuf> {
        let path_var = std::env::var_os("PATH")?;
        let entries: Vec<PathBuf> = std::env::split_paths(&path_var).collect();
        resolve_tool_path(name, &entries)
    }

    fn is_elevated(&self) -> bool {
        crate::shell::is_elevated()
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On non-Unix hosts any regular file counts.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. Does NOT shell out
/// to `which`, whose behavior varies across systems.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    path_entries
        .iter()
        .map(|dir| dir.join(tool))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}
