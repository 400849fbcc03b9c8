//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::{
    prompt_confirm, should_use_colors, InstallerTheme, NonInteractiveUI, OutputMode,
    ProgressSpinner, Prompt, RunSummary, SpinnerHandle, UserInterface,
};

/// Interactive terminal UI implementation.
pub struct TerminalUI {
    term: Term,
    theme: InstallerTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            InstallerTheme::new()
        } else {
            InstallerTheme::plain()
        };

        Self {
            term: Term::stdout(),
            theme,
            mode,
        }
    }

    fn write_bucket(&mut self, title: &str, modules: &[String]) {
        if modules.is_empty() {
            return;
        }
        let b = &self.theme.border;
        writeln!(self.term, "  {} {}", b.apply_to("│"), self.theme.highlight.apply_to(title)).ok();
        for module in modules {
            writeln!(self.term, "  {}   - {}", b.apply_to("│"), module).ok();
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_info(msg)).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "{}", self.theme.format_success(msg)).ok();
        }
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.term, "{}", self.theme.format_error(msg)).ok();
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        prompt_confirm(prompt, &self.term)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        if self.mode.shows_spinners() {
            Box::new(ProgressSpinner::new(message, self.theme.clone()))
        } else {
            Box::new(ProgressSpinner::hidden())
        }
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_status() {
            writeln!(self.term, "\n{}\n", self.theme.format_header(title)).ok();
        }
    }

    fn show_summary(&mut self, summary: &RunSummary) {
        let b = self.theme.border.clone();

        writeln!(self.term).ok();
        writeln!(
            self.term,
            "  {} {}",
            b.apply_to("┌─"),
            self.theme.header.apply_to("Installation Summary")
        )
        .ok();

        for (label, count) in summary.count_rows() {
            writeln!(
                self.term,
                "  {} {:<26}{}/{}",
                b.apply_to("│"),
                format!("{}:", label),
                count,
                summary.total
            )
            .ok();
        }

        if !summary.not_found.is_empty()
            || !summary.user_skipped.is_empty()
            || !summary.failed.is_empty()
        {
            writeln!(self.term, "  {}", b.apply_to("├────────────────────────────────────")).ok();
        }
        self.write_bucket("Not found in system repository or on CPAN:", &summary.not_found);
        self.write_bucket("Declined CPAN install:", &summary.user_skipped);
        self.write_bucket("Failed modules:", &summary.failed);

        writeln!(self.term, "  {}", b.apply_to("└────────────────────────────────────")).ok();
    }

    fn is_interactive(&self) -> bool {
        self.term.is_term()
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
