//! The end-to-end installation run.

use std::path::{Path, PathBuf};

use crate::config::RunConfig;
use crate::detection::{detect, DetectionSource, Host, PackageManagerProfile};
use crate::error::{InstallerError, Result};
use crate::manifest::{load, locate, Manifest};
use crate::registry::RegistryClient;
use crate::report::{Reporter, RunLog};
use crate::shell::CommandRunner;
use crate::ui::{Align, Prompt, RunSummary, Table, UserInterface};

use super::engine::Resolver;
use super::helper::{bootstrap_cpanm, HelperBootstrap, RegistryInstaller};

/// Prompt key for the plan confirmation.
pub const PROCEED_PROMPT_KEY: &str = "proceed";

/// Runs the whole pipeline: locate, detect, parse, confirm, resolve, report.
pub struct Installer<'a> {
    config: &'a RunConfig,
    host: &'a dyn Host,
    runner: &'a dyn CommandRunner,
    registry: &'a dyn RegistryClient,
    cwd: PathBuf,
}

impl<'a> Installer<'a> {
    pub fn new(
        config: &'a RunConfig,
        host: &'a dyn Host,
        runner: &'a dyn CommandRunner,
        registry: &'a dyn RegistryClient,
        cwd: &Path,
    ) -> Self {
        Self {
            config,
            host,
            runner,
            registry,
            cwd: cwd.to_path_buf(),
        }
    }

    /// Run the installer.
    ///
    /// Run-level failures are reported and returned as errors. Per-module
    /// failures are part of the returned summary. The run log is written on
    /// every path out.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<RunSummary> {
        let log = RunLog::new(self.config.log_file.clone());
        let mut reporter = Reporter::new(ui, log, self.config.dry_run);

        let result = self.execute(&mut reporter);
        if let Err(e) = &result {
            if e.is_soft_stop() {
                reporter.warning(&e.to_string());
            } else {
                reporter.error(&e.to_string());
            }
        }

        reporter.flush_log();
        result
    }

    fn execute(&self, reporter: &mut Reporter<'_>) -> Result<RunSummary> {
        if self.config.requires_privilege() && !self.host.is_elevated() {
            return Err(InstallerError::PrivilegeRequired {
                operation: "installing Perl modules".to_string(),
            });
        }
        if self.config.dry_run {
            reporter.info("Dry run: nothing will be installed");
        }

        let location = locate(self.config.manifest_path.as_deref(), &self.cwd)?;
        if location.fallback {
            reporter.warning(&format!(
                "No cpanfile at the specified location, using {}",
                location.path.display()
            ));
        }
        reporter.success(&format!("Found cpanfile: {}", location.path.display()));

        let profile = detect(self.host)?;
        reporter.success(&format!(
            "Detected package manager: {}{}",
            profile.manager,
            detection_note(&profile)
        ));

        let manifest = load(&location.path)?;
        reporter.info(&format!(
            "Found {} modules in cpanfile",
            manifest.modules.len()
        ));

        self.show_plan(&manifest, &profile, reporter);

        if self.config.needs_plan_confirmation() {
            let prompt = Prompt::new(PROCEED_PROMPT_KEY, "Proceed with installation?", Some(false));
            if !reporter.confirm(&prompt)? {
                return Err(InstallerError::Cancelled);
            }
        }

        if let HelperBootstrap::Failed { .. } =
            bootstrap_cpanm(self.config, self.host, self.runner, reporter)
        {
            match RegistryInstaller::select(self.host) {
                RegistryInstaller::Unavailable => {
                    reporter.warning("Neither cpanm nor cpan is available, CPAN installs will fail")
                }
                fallback => reporter.info(&format!("CPAN installs will use {}", fallback.name())),
            }
        }

        let resolver = Resolver::new(&profile, self.config, self.host, self.runner, self.registry);
        for module in &manifest.modules {
            let outcome = resolver.resolve(module, reporter);
            reporter.record(module, outcome);
        }

        Ok(reporter.show_summary())
    }

    fn show_plan(
        &self,
        manifest: &Manifest,
        profile: &PackageManagerProfile,
        reporter: &mut Reporter<'_>,
    ) {
        let mut table = Table::new(&["#", "Module", "Package"]).align(0, Align::Right);
        for (i, module) in manifest.modules.iter().enumerate() {
            table.add_row(&[
                (i + 1).to_string(),
                module.to_string(),
                module.native_package_name(),
            ]);
        }

        reporter.header("Perl Modules to Install");
        reporter.display(&table.render());
        reporter.display(&format!("\nTotal modules: {}", table.row_count()));
        reporter.display(&format!("Package manager: {}", profile.manager));
    }
}

fn detection_note(profile: &PackageManagerProfile) -> String {
    match &profile.source {
        DetectionSource::OsRelease { distribution } => format!(" ({})", distribution),
        DetectionSource::Darwin => " (macOS)".to_string(),
        DetectionSource::PathProbe { executable } => format!(" (found {} on PATH)", executable),
    }
}
