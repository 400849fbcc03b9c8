//! Interactive user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for piped or CI sessions
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use cpanfile_installer::ui::{create_ui, OutputMode, UserInterface};
//!
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Perl Modules to Install");
//! ui.success("Found cpanfile");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod prompts;
pub mod spinner;
pub mod table;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI, SpinnerStatus};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use prompts::prompt_confirm;
pub use spinner::ProgressSpinner;
pub use table::{Align, Table};
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, InstallerTheme};

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &Prompt) -> Result<bool>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show the end-of-run summary.
    fn show_summary(&mut self, summary: &RunSummary);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Mark as skipped.
    fn finish_skipped(&mut self, msg: &str);
}

/// A yes/no question to put to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt, used for env overrides and test responses.
    pub key: String,
    /// The question to display.
    pub question: String,
    /// Answer used when the user just presses enter or cannot be asked.
    pub default: Option<bool>,
}

impl Prompt {
    /// Create a prompt.
    pub fn new(key: &str, question: &str, default: Option<bool>) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            default,
        }
    }
}

/// Parse a yes/no answer.
pub fn parse_answer(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// End-of-run summary, modules grouped by outcome bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Number of modules processed.
    pub total: usize,
    /// Installed natively or through the registry.
    pub installed: Vec<String>,
    /// Already satisfied before the run.
    pub already_satisfied: Vec<String>,
    /// Neither the native repository nor the registry could provide them.
    pub not_found: Vec<String>,
    /// The user declined a registry install.
    pub user_skipped: Vec<String>,
    /// Failed for any other reason.
    pub failed: Vec<String>,
    /// Would have been installed (dry run).
    pub planned: Vec<String>,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// True when no module failed.
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Count rows to display as (label, count). Zero-count optional rows are left out.
    pub fn count_rows(&self) -> Vec<(&'static str, usize)> {
        let mut rows = vec![
            ("Successful", self.installed.len()),
            ("Already installed", self.already_satisfied.len()),
        ];
        if self.dry_run {
            rows.push(("Planned (dry run)", self.planned.len()));
        }
        let optional = [
            ("Not found in repository", self.not_found.len()),
            ("Skipped by user", self.user_skipped.len()),
            ("Failed", self.failed.len()),
        ];
        rows.extend(optional.into_iter().filter(|(_, n)| *n > 0));
        rows
    }

    /// One-line tally for the run log.
    pub fn tally(&self) -> String {
        format!(
            "Installation complete: {} successful, {} already installed, {} not found, {} skipped, {} failed",
            self.installed.len(),
            self.already_satisfied.len(),
            self.not_found.len(),
            self.user_skipped.len(),
            self.failed.len()
        )
    }
}
