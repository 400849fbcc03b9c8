//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt answers.
//!
//! # Example
//!
//! ```
//! use cpanfile_installer::ui::{MockUI, Prompt, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("proceed", true);
//!
//! let prompt = Prompt::new("proceed", "Proceed with installation?", Some(false));
//! assert!(ui.confirm(&prompt).unwrap());
//! ui.success("Done!");
//!
//! assert!(ui.has_success("Done!"));
//! assert_eq!(ui.prompts_shown(), &["proceed".to_string()]);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::Result;

use super::{OutputMode, Prompt, RunSummary, SpinnerHandle, UserInterface};

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    interactive: bool,
    messages: Vec<String>,
    successes: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    spinners: Vec<MockSpinner>,
    summaries: Vec<RunSummary>,
    prompt_responses: HashMap<String, bool>,
    prompts_shown: Vec<String>,
    /// Answer for any prompt key not in `prompt_responses`.
    default_prompt_response: Option<bool>,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self {
            mode: OutputMode::Normal,
            interactive: true,
            ..Default::default()
        }
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            interactive: true,
            ..Default::default()
        }
    }

    /// Set the answer for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, answer: bool) {
        self.prompt_responses.insert(key.to_string(), answer);
    }

    /// Set the answer for every prompt without a keyed response.
    pub fn set_default_prompt_response(&mut self, answer: bool) {
        self.default_prompt_response = Some(answer);
    }

    /// Set whether the mock reports itself as interactive.
    pub fn set_interactive(&mut self, interactive: bool) {
        self.interactive = interactive;
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Spinners started, in order.
    pub fn spinners(&self) -> &[MockSpinner] {
        &self.spinners
    }

    pub fn summaries(&self) -> &[RunSummary] {
        &self.summaries
    }

    /// Keys of the prompts that were asked.
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Check if any message contains the given text.
    pub fn has_message(&self, text: &str) -> bool {
        self.messages.iter().any(|m| m.contains(text))
    }

    /// Check if any success contains the given text.
    pub fn has_success(&self, text: &str) -> bool {
        self.successes.iter().any(|m| m.contains(text))
    }

    /// Check if any warning contains the given text.
    pub fn has_warning(&self, text: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(text))
    }

    /// Check if any error contains the given text.
    pub fn has_error(&self, text: &str) -> bool {
        self.errors.iter().any(|m| m.contains(text))
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn confirm(&mut self, prompt: &Prompt) -> Result<bool> {
        self.prompts_shown.push(prompt.key.clone());

        let answer = self
            .prompt_responses
            .get(&prompt.key)
            .copied()
            .or(self.default_prompt_response)
            .or(prompt.default)
            .unwrap_or(false);

        Ok(answer)
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let spinner = MockSpinner::new(message);
        self.spinners.push(spinner.clone());
        Box::new(spinner)
    }

    fn show_header(&mut self, title: &str) {
        self.headers.push(title.to_string());
    }

    fn show_summary(&mut self, summary: &RunSummary) {
        self.summaries.push(summary.clone());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// How a mock spinner was finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    Success,
    Error,
    Skipped,
}

#[derive(Debug, Default)]
struct SpinnerState {
    message: String,
    finished: Option<(SpinnerStatus, String)>,
}

/// Spinner that records how it finished.
///
/// Clones share state, so the copy kept by [`MockUI`] sees what the code
/// under test did with the handle it was given.
#[derive(Debug, Clone, Default)]
pub struct MockSpinner {
    state: Arc<Mutex<SpinnerState>>,
}

impl MockSpinner {
    fn new(message: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(SpinnerState {
                message: message.to_string(),
                finished: None,
            })),
        }
    }

    /// Current spinner message.
    pub fn message(&self) -> String {
        self.state
            .lock()
            .map(|s| s.message.clone())
            .unwrap_or_default()
    }

    /// Final status and message, if finished.
    pub fn finished(&self) -> Option<(SpinnerStatus, String)> {
        self.state.lock().ok().and_then(|s| s.finished.clone())
    }

    fn finish(&mut self, status: SpinnerStatus, msg: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.finished = Some((status, msg.to_string()));
        }
    }
}

impl SpinnerHandle for MockSpinner {
    fn set_message(&mut self, msg: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.message = msg.to_string();
        }
    }

    fn finish_success(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Skipped, msg);
    }
}
