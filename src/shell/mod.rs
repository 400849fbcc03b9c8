//! Shell command execution and platform checks.

pub mod command;
pub mod platform;

pub use command::{execute, CommandOptions, CommandResult, CommandRunner, ShellRunner};
pub use platform::{is_ci, is_darwin, is_elevated};
