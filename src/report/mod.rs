//! Run reporting.
//!
//! [`Reporter`] is the single sink for user-facing events during a run. Each
//! event goes to the [`UserInterface`] and into the [`RunLog`], and module
//! outcomes are collected for the end-of-run summary.

pub mod log;

pub use log::{LogEntry, LogLevel, RunLog};

use crate::error::Result;
use crate::install::{ModuleOutcome, OutcomeBucket};
use crate::manifest::ModuleName;
use crate::shell::CommandResult;
use crate::ui::{Prompt, RunSummary, SpinnerHandle, UserInterface};

/// Routes run events to the UI and the run log.
pub struct Reporter<'a> {
    ui: &'a mut dyn UserInterface,
    log: RunLog,
    results: Vec<(ModuleName, ModuleOutcome)>,
    dry_run: bool,
}

impl<'a> Reporter<'a> {
    pub fn new(ui: &'a mut dyn UserInterface, log: RunLog, dry_run: bool) -> Self {
        Self {
            ui,
            log,
            results: Vec::new(),
            dry_run,
        }
    }

    pub fn info(&mut self, msg: &str) {
        self.log.record(LogLevel::Info, msg);
        self.ui.message(msg);
    }

    pub fn success(&mut self, msg: &str) {
        self.log.record(LogLevel::Success, msg);
        self.ui.success(msg);
    }

    pub fn warning(&mut self, msg: &str) {
        self.log.record(LogLevel::Warning, msg);
        self.ui.warning(msg);
    }

    pub fn error(&mut self, msg: &str) {
        self.log.record(LogLevel::Error, msg);
        self.ui.error(msg);
    }

    /// Log-only diagnostic, also emitted through tracing.
    pub fn debug(&mut self, msg: &str) {
        tracing::debug!("{}", msg);
        self.log.record(LogLevel::Debug, msg);
    }

    /// Record the output of a failed command; shown on screen in verbose mode.
    pub fn command_output(&mut self, command: &str, result: &CommandResult) {
        let output = result.combined_output();
        if output.is_empty() {
            return;
        }
        self.log
            .record(LogLevel::Debug, &format!("Output of '{}':\n{}", command, output));
        if self.ui.output_mode().shows_command_output() {
            self.ui.message(&output);
        }
    }

    pub fn header(&mut self, title: &str) {
        self.ui.show_header(title);
    }

    /// Print a pre-rendered block (such as a table) without logging it.
    pub fn display(&mut self, text: &str) {
        self.ui.message(text);
    }

    pub fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        let answer = self.ui.confirm(prompt)?;
        self.log.record(
            LogLevel::Info,
            &format!("{} {}", prompt.question, if answer { "yes" } else { "no" }),
        );
        Ok(answer)
    }

    pub fn start_spinner(&mut self, msg: &str) -> Box<dyn SpinnerHandle> {
        self.ui.start_spinner(msg)
    }

    /// Record the outcome for one module.
    pub fn record(&mut self, module: &ModuleName, outcome: ModuleOutcome) {
        self.log.record(
            if outcome.is_failure() {
                LogLevel::Error
            } else {
                LogLevel::Info
            },
            &format!("{}: {}", module, outcome),
        );
        self.results.push((module.clone(), outcome));
    }

    /// Group the recorded outcomes into a summary.
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            total: self.results.len(),
            dry_run: self.dry_run,
            ..Default::default()
        };
        for (module, outcome) in &self.results {
            let name = module.to_string();
            match outcome.bucket() {
                OutcomeBucket::Installed => summary.installed.push(name),
                OutcomeBucket::AlreadySatisfied => summary.already_satisfied.push(name),
                OutcomeBucket::NotFound => summary.not_found.push(name),
                OutcomeBucket::UserSkipped => summary.user_skipped.push(name),
                OutcomeBucket::Planned => summary.planned.push(name),
                OutcomeBucket::Failed => summary.failed.push(name),
            }
        }
        summary
    }

    /// Show the summary and log its tally.
    pub fn show_summary(&mut self) -> RunSummary {
        let summary = self.summary();
        self.ui.show_summary(&summary);
        self.log.record(LogLevel::Info, &summary.tally());
        summary
    }

    /// Write the run log. Failure is reported, never fatal.
    pub fn flush_log(&mut self) {
        if let Err(e) = self.log.flush() {
            let path = self
                .log
                .destination()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            self.ui
                .warning(&format!("Failed to write log file {}: {}", path, e));
        }
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }
}
