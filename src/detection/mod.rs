//! Host environment detection.
//!
//! # Modules
//!
//! - [`host`] - The [`Host`] capability and its real implementation
//! - [`os_release`] - `/etc/os-release` field parsing
//! - [`package_manager`] - Native package manager selection

pub mod host;
pub mod os_release;
pub mod package_manager;

pub use host::{Host, SystemHost};
pub use package_manager::{detect, DetectionSource, PackageManager, PackageManagerProfile};
