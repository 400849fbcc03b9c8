//! Cpanfile location and parsing.
//!
//! # Modules
//!
//! - [`locator`] - Resolve the positional path argument to one cpanfile
//! - [`module`] - Module names and native package name derivation
//! - [`parser`] - Extract required modules from cpanfile contents

pub mod locator;
pub mod module;
pub mod parser;

pub use locator::{locate, ManifestLocation, MANIFEST_FILE_NAME};
pub use module::ModuleName;
pub use parser::{load, parse, Manifest};
