//! Module installation.
//!
//! # Modules
//!
//! - [`checker`] - Already-installed probes
//! - [`engine`] - Per-module resolution state machine
//! - [`helper`] - cpanm/cpan selection and the cpanm bootstrap
//! - [`installer`] - The end-to-end run
//! - [`status`] - Module outcomes and summary buckets

pub mod checker;
pub mod engine;
pub mod helper;
pub mod installer;
pub mod status;

#[cfg(test)]
pub(crate) mod testing;

pub use checker::{InstallationChecker, Presence};
pub use engine::{is_not_found_output, Resolver, NOT_FOUND_PHRASES};
pub use helper::{bootstrap_cpanm, HelperBootstrap, RegistryInstaller};
pub use installer::Installer;
pub use status::{ModuleOutcome, OutcomeBucket};
