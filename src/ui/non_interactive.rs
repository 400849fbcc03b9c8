//! Non-interactive UI for piped, cron and CI sessions.

use std::collections::HashMap;

use crate::error::{InstallerError, Result};

use super::{parse_answer, OutputMode, Prompt, RunSummary, SpinnerHandle, UserInterface};

/// Prefix of environment variables that answer prompts by key.
pub const PROMPT_ENV_PREFIX: &str = "CPAN_INSTALLER_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `CPAN_INSTALLER_PROMPT_<KEY>` environment
/// variables, falling back to the prompt's default.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }

    /// Environment variable consulted for a prompt key.
    pub fn env_key(prompt_key: &str) -> String {
        format!(
            "{}{}",
            PROMPT_ENV_PREFIX,
            prompt_key.to_uppercase().replace(['-', ':'], "_")
        )
    }
}

impl UserInterface for NonInteractiveUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("✓ {}", msg);
        }
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        if let Some(value) = self.env_overrides.get(&Self::env_key(&prompt.key)) {
            if let Some(answer) = parse_answer(value) {
                return Ok(answer);
            }
        }

        prompt.default.ok_or_else(|| {
            InstallerError::Other(anyhow::anyhow!(
                "Cannot ask '{}' in non-interactive mode (no default answer)",
                prompt.question
            ))
        })
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let verbose = self.mode.shows_command_output();
        if verbose {
            println!("  {}", message);
        }
        Box::new(LineSpinner { verbose })
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            println!("\n{}\n", title);
        }
    }

    fn show_summary(&mut self, summary: &RunSummary) {
        println!();
        println!("  ┌─ Installation Summary ─────────────");
        for (label, count) in summary.count_rows() {
            println!("  │ {:<26}{}/{}", format!("{}:", label), count, summary.total);
        }

        let buckets = [
            ("Not found in system repository or on CPAN:", &summary.not_found),
            ("Declined CPAN install:", &summary.user_skipped),
            ("Failed modules:", &summary.failed),
        ];
        if buckets.iter().any(|(_, modules)| !modules.is_empty()) {
            println!("  ├────────────────────────────────────");
        }
        for (title, modules) in buckets {
            if modules.is_empty() {
                continue;
            }
            println!("  │ {}", title);
            for module in modules {
                println!("  │   - {}", module);
            }
        }
        println!("  └────────────────────────────────────");
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Spinner stand-in that prints its outcome line in verbose mode.
///
/// Status messages already report each step, so a piped log only gets the
/// spinner lines when asked for everything.
struct LineSpinner {
    verbose: bool,
}

impl SpinnerHandle for LineSpinner {
    fn set_message(&mut self, _msg: &str) {}

    fn finish_success(&mut self, msg: &str) {
        if self.verbose {
            println!("  ✓ {}", msg);
        }
    }

    fn finish_error(&mut self, msg: &str) {
        if self.verbose {
            println!("  ✗ {}", msg);
        }
    }

    fn finish_skipped(&mut self, msg: &str) {
        if self.verbose {
            println!("  ○ {}", msg);
        }
    }
}
