//! The install command.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::detection::SystemHost;
use crate::error::Result;
use crate::install::Installer;
use crate::registry::MetaCpanClient;
use crate::shell::ShellRunner;
use crate::ui::UserInterface;

use super::{Command, CommandResult};

/// Installs the modules of one cpanfile on the real host.
pub struct InstallCommand {
    cwd: PathBuf,
    config: RunConfig,
}

impl InstallCommand {
    pub fn new(cwd: &Path, config: RunConfig) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            config,
        }
    }
}

impl Command for InstallCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let registry =
            MetaCpanClient::new(&self.config.registry_url, self.config.timeouts.registry_http)?;
        let installer = Installer::new(&self.config, &SystemHost, &ShellRunner, &registry, &self.cwd);

        match installer.run(ui) {
            Ok(summary) if summary.success() => Ok(CommandResult::success()),
            Ok(_) => Ok(CommandResult::failure(1)),
            Err(e) => {
                tracing::debug!("run aborted: {:?}", e);
                Ok(CommandResult::failure(1))
            }
        }
    }
}
