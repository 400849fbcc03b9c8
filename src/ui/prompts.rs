//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use crate::error::{InstallerError, Result};

use super::Prompt;

/// Convert dialoguer errors to InstallerError.
fn map_dialoguer_err(e: dialoguer::Error) -> InstallerError {
    InstallerError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Ask a yes/no question on the terminal.
pub fn prompt_confirm(prompt: &Prompt, term: &Term) -> Result<bool> {
    let theme = prompt_theme();
    let mut confirm = Confirm::with_theme(&theme).with_prompt(&prompt.question);

    if let Some(default) = prompt.default {
        confirm = confirm.default(default);
    }

    confirm.interact_on(term).map_err(map_dialoguer_err)
}
