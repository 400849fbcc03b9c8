//! cpanfile-installer - install the Perl modules a cpanfile requires.
//!
//! Modules are installed through the host's native package manager where
//! possible, falling back to CPAN (`cpanm` or `cpan`) for modules the system
//! repository does not carry.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Run configuration and timeouts
//! - [`detection`] - Host and package manager detection
//! - [`error`] - Error types and result aliases
//! - [`install`] - Installed-state checks and module resolution
//! - [`manifest`] - cpanfile discovery and parsing
//! - [`registry`] - MetaCPAN lookups
//! - [`report`] - Run reporting and the run log
//! - [`shell`] - Shell command execution
//! - [`ui`] - Prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use cpanfile_installer::manifest::parse;
//!
//! let modules = parse("requires 'JSON::XS';\nrequires \"Foo::Bar\";\n");
//! assert_eq!(modules[1].native_package_name(), "libfoo-bar-perl");
//! ```

pub mod cli;
pub mod config;
pub mod detection;
pub mod error;
pub mod install;
pub mod manifest;
pub mod registry;
pub mod report;
pub mod shell;
pub mod ui;

pub use error::{InstallerError, Result};
