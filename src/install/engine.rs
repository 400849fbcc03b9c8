//! Per-module resolution.
//!
//! Each module is driven through a small state machine. A step does one
//! thing (a probe, an install, a registry lookup, a prompt) and names the
//! next step, until the module reaches a final [`ModuleOutcome`]:
//!
//! ```text
//! CheckNative ─installed─▶ Done(AlreadySatisfiedNative)
//!     │        ─timeout──▶ Done(Failed)
//! CheckRuntime ─loadable─▶ Done(AlreadySatisfiedRuntime)
//!     │        ─timeout──▶ Done(Failed)
//!     │        ─dry run──▶ Done(Planned)
//! InstallNative ─ok──────▶ Done(InstalledNative)
//!     │         ─error───▶ Done(Failed)
//!     │ not found
//!     ├─ registry disabled ▶ Done(SkippedNoRegistry)
//! LookupRegistry ─absent─▶ Done(NotFound)
//!     │
//! Offer ─declined────────▶ Done(SkippedByUser)
//!     │
//! InstallRegistry ─ok────▶ Done(InstalledViaRegistry)
//!                 ─error─▶ Done(Failed)
//! ```

use crate::config::RunConfig;
use crate::detection::{Host, PackageManagerProfile};
use crate::error::InstallerError;
use crate::manifest::ModuleName;
use crate::registry::{ModuleRecord, RegistryClient};
use crate::report::Reporter;
use crate::shell::{CommandOptions, CommandResult, CommandRunner};
use crate::ui::Prompt;

use super::checker::{InstallationChecker, Presence};
use super::helper::RegistryInstaller;
use super::status::ModuleOutcome;

/// Output fragments package managers print when a package does not exist.
pub const NOT_FOUND_PHRASES: &[&str] = &[
    "not found",
    "no package",
    "package not available",
    "unable to locate package",
    "no matching package",
    "could not find a match",
];

/// Whether a failed install reads as "no such package".
pub fn is_not_found_output(result: &CommandResult) -> bool {
    let stdout = result.stdout.to_lowercase();
    let stderr = result.stderr.to_lowercase();
    NOT_FOUND_PHRASES
        .iter()
        .any(|phrase| stdout.contains(phrase) || stderr.contains(phrase))
}

/// Prompt key for the registry-install question about `module`.
pub fn registry_prompt_key(module: &ModuleName) -> String {
    format!("cpan-install-{}", module)
}

#[derive(Debug)]
enum Step {
    CheckNative,
    CheckRuntime,
    InstallNative,
    LookupRegistry,
    Offer(ModuleRecord),
    InstallRegistry,
    Done(ModuleOutcome),
}

/// Resolves modules one at a time against the host.
pub struct Resolver<'a> {
    profile: &'a PackageManagerProfile,
    config: &'a RunConfig,
    host: &'a dyn Host,
    runner: &'a dyn CommandRunner,
    registry: &'a dyn RegistryClient,
}

impl<'a> Resolver<'a> {
    pub fn new(
        profile: &'a PackageManagerProfile,
        config: &'a RunConfig,
        host: &'a dyn Host,
        runner: &'a dyn CommandRunner,
        registry: &'a dyn RegistryClient,
    ) -> Self {
        Self {
            profile,
            config,
            host,
            runner,
            registry,
        }
    }

    /// Drive one module to its final outcome.
    ///
    /// Never fails: every error becomes an outcome for this module.
    pub fn resolve(&self, module: &ModuleName, reporter: &mut Reporter<'_>) -> ModuleOutcome {
        let package = module.native_package_name();
        let mut step = Step::CheckNative;

        loop {
            tracing::trace!("{}: {:?}", module, step);
            step = match step {
                Step::Done(outcome) => return outcome,
                Step::CheckNative => self.check_native(module, &package, reporter),
                Step::CheckRuntime => self.check_runtime(module, &package, reporter),
                Step::InstallNative => self.install_native(module, &package, reporter),
                Step::LookupRegistry => self.lookup_registry(module, reporter),
                Step::Offer(record) => self.offer(module, &record, reporter),
                Step::InstallRegistry => self.install_registry(module, reporter),
            };
        }
    }

    fn checker(&self) -> InstallationChecker<'_> {
        InstallationChecker::new(self.runner, self.config.timeouts)
    }

    fn check_native(&self, module: &ModuleName, package: &str, reporter: &mut Reporter<'_>) -> Step {
        match self.checker().native_installed(self.profile.manager, package) {
            Presence::Present => {
                reporter.success(&format!("Already installed: {} ({})", module, package));
                Step::Done(ModuleOutcome::AlreadySatisfiedNative)
            }
            Presence::Absent => Step::CheckRuntime,
            Presence::TimedOut(e) => probe_timed_out(module, e, reporter),
        }
    }

    fn check_runtime(&self, module: &ModuleName, package: &str, reporter: &mut Reporter<'_>) -> Step {
        match self.checker().runtime_available(module) {
            Presence::Present => {
                reporter.success(&format!("Already installed: {} (loadable by perl)", module));
                return Step::Done(ModuleOutcome::AlreadySatisfiedRuntime);
            }
            Presence::TimedOut(e) => return probe_timed_out(module, e, reporter),
            Presence::Absent => {}
        }
        if self.config.dry_run {
            reporter.info(&format!("[DRY RUN] Would install: {}", package));
            return Step::Done(ModuleOutcome::Planned);
        }
        Step::InstallNative
    }

    fn install_native(&self, module: &ModuleName, package: &str, reporter: &mut Reporter<'_>) -> Step {
        let command = self.profile.install_command(package);
        let options = CommandOptions::with_timeout(self.config.timeouts.native_install);

        reporter.info(&format!("Installing {} ({})...", module, package));
        let mut spinner = reporter.start_spinner(&format!("Installing {}", package));

        let result = match self.runner.run(&command, &options) {
            Ok(result) => result,
            Err(e) => {
                spinner.finish_error(&format!("Failed to install {}", package));
                reporter.error(&format!("Failed to install {}: {}", module, e));
                return Step::Done(ModuleOutcome::failed(e.to_string()));
            }
        };

        if result.success {
            spinner.finish_success(&format!("Installed {}", package));
            reporter.success(&format!("Successfully installed: {}", module));
            return Step::Done(ModuleOutcome::InstalledNative);
        }

        reporter.command_output(&command, &result);

        if is_not_found_output(&result) {
            spinner.finish_skipped(&format!("{} is not in the system repository", package));
            reporter.warning(&format!(
                "Package not found in system repository: {}",
                package
            ));
            if !self.config.use_registry {
                reporter.info(&format!("CPAN fallback disabled, skipping {}", module));
                return Step::Done(ModuleOutcome::SkippedNoRegistry);
            }
            return Step::LookupRegistry;
        }

        spinner.finish_error(&format!("Failed to install {}", package));
        let err = InstallerError::PackageInstallFailed {
            package: package.to_string(),
            message: failure_detail(&result),
        };
        reporter.error(&format!("Failed to install {}: {}", module, err));
        Step::Done(ModuleOutcome::failed(err.to_string()))
    }

    fn lookup_registry(&self, module: &ModuleName, reporter: &mut Reporter<'_>) -> Step {
        reporter.info(&format!("Searching CPAN for module: {}...", module));

        match self.registry.lookup(module.as_str()) {
            Ok(Some(record)) => {
                reporter.info(&format!(
                    "Module exists on CPAN (v{})",
                    record.version_label()
                ));
                if let Some(summary) = &record.summary {
                    reporter.debug(&format!("{}: {}", module, summary));
                }
                Step::Offer(record)
            }
            Ok(None) => {
                reporter.warning(&format!("Module not found on CPAN: {}", module));
                Step::Done(ModuleOutcome::NotFound)
            }
            Err(e) => {
                reporter.warning(&e.to_string());
                Step::Done(ModuleOutcome::NotFound)
            }
        }
    }

    fn offer(&self, module: &ModuleName, record: &ModuleRecord, reporter: &mut Reporter<'_>) -> Step {
        if self.config.dry_run {
            reporter.info(&format!("[DRY RUN] Would install from CPAN: {}", module));
            return Step::Done(ModuleOutcome::NotFound);
        }
        if self.config.assume_yes {
            return Step::InstallRegistry;
        }

        let prompt = Prompt::new(
            &registry_prompt_key(module),
            &format!(
                "Install {} (v{}) from CPAN?",
                module,
                record.version_label()
            ),
            Some(false),
        );

        match reporter.confirm(&prompt) {
            Ok(true) => Step::InstallRegistry,
            Ok(false) => {
                reporter.info(&format!("Skipping CPAN install of {}", module));
                Step::Done(ModuleOutcome::SkippedByUser)
            }
            Err(e) => {
                reporter.warning(&format!("Could not ask about {}: {}", module, e));
                Step::Done(ModuleOutcome::SkippedByUser)
            }
        }
    }

    fn install_registry(&self, module: &ModuleName, reporter: &mut Reporter<'_>) -> Step {
        if !self.host.is_elevated() {
            let err = InstallerError::PrivilegeRequired {
                operation: format!("install {} from CPAN", module),
            };
            reporter.error(&err.to_string());
            return Step::Done(ModuleOutcome::failed(err.to_string()));
        }

        let installer = RegistryInstaller::select(self.host);
        let Some((command, options)) = installer.command(module) else {
            let err = InstallerError::RegistryInstallFailed {
                module: module.to_string(),
                message: "neither cpanm nor cpan is available".to_string(),
            };
            reporter.error(&err.to_string());
            return Step::Done(ModuleOutcome::failed(err.to_string()));
        };
        let options = CommandOptions {
            timeout: Some(self.config.timeouts.registry_install),
            ..options
        };

        reporter.info(&format!(
            "Installing {} from CPAN with {}...",
            module,
            installer.name()
        ));
        let mut spinner = reporter.start_spinner(&format!("Installing {} from CPAN", module));

        match self.runner.run(&command, &options) {
            Ok(result) if result.success => {
                spinner.finish_success(&format!("Installed {}", module));
                reporter.success(&format!("Successfully installed from CPAN: {}", module));
                Step::Done(ModuleOutcome::InstalledViaRegistry)
            }
            Ok(result) => {
                spinner.finish_error(&format!("Failed to install {}", module));
                reporter.command_output(&command, &result);
                let err = InstallerError::RegistryInstallFailed {
                    module: module.to_string(),
                    message: failure_detail(&result),
                };
                reporter.error(&err.to_string());
                Step::Done(ModuleOutcome::failed(err.to_string()))
            }
            Err(e) => {
                spinner.finish_error(&format!("Failed to install {}", module));
                reporter.error(&format!("Failed to install {} from CPAN: {}", module, e));
                Step::Done(ModuleOutcome::failed(e.to_string()))
            }
        }
    }
}

fn probe_timed_out(module: &ModuleName, err: InstallerError, reporter: &mut Reporter<'_>) -> Step {
    reporter.error(&format!("Could not check {}: {}", module, err));
    Step::Done(ModuleOutcome::failed(err.to_string()))
}

/// Last line of stderr, or the exit code when stderr is empty.
fn failure_detail(result: &CommandResult) -> String {
    result
        .stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| match result.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{DetectionSource, PackageManager};
    use crate::install::testing::{FakeHost, FakeRegistry, FakeRunner, Reply};
    use crate::report::RunLog;
    use crate::ui::MockUI;
    use std::time::Duration;

    const APT_NOT_FOUND: &str = "E: Unable to locate package libfoo-bar-perl";

    fn apt() -> PackageManagerProfile {
        PackageManagerProfile {
            manager: PackageManager::Apt,
            source: DetectionSource::OsRelease {
                distribution: "debian".to_string(),
            },
        }
    }

    struct Fixture {
        profile: PackageManagerProfile,
        config: RunConfig,
        host: FakeHost,
        runner: FakeRunner,
        registry: FakeRegistry,
        ui: MockUI,
    }

    impl Fixture {
        fn new(runner: FakeRunner) -> Self {
            Self {
                profile: apt(),
                config: RunConfig::default(),
                host: FakeHost::debian_root(),
                runner,
                registry: FakeRegistry::new(),
                ui: MockUI::new(),
            }
        }

        fn resolve(&mut self, module: &str) -> ModuleOutcome {
            let resolver = Resolver::new(
                &self.profile,
                &self.config,
                &self.host,
                &self.runner,
                &self.registry,
            );
            let mut reporter = Reporter::new(&mut self.ui, RunLog::new(None), self.config.dry_run);
            resolver.resolve(&ModuleName::new(module), &mut reporter)
        }
    }

    #[test]
    fn native_package_already_installed() {
        let mut f = Fixture::new(FakeRunner::new().on("dpkg -l libjson-xs-perl", Reply::Succeed));

        assert_eq!(f.resolve("JSON::XS"), ModuleOutcome::AlreadySatisfiedNative);
        assert!(f.ui.has_success("Already installed: JSON::XS (libjson-xs-perl)"));
        assert!(!f.runner.ran("perl"));
        assert!(!f.runner.ran("apt-get"));
    }

    #[test]
    fn runtime_loadable_module_is_satisfied() {
        let mut f = Fixture::new(FakeRunner::new().on("perl -MMoose -e 1", Reply::Succeed));

        assert_eq!(f.resolve("Moose"), ModuleOutcome::AlreadySatisfiedRuntime);
        assert!(!f.runner.ran("apt-get"));
    }

    #[test]
    fn dry_run_reports_plan_and_installs_nothing() {
        let mut f = Fixture::new(FakeRunner::new());
        f.config.dry_run = true;

        assert_eq!(f.resolve("Foo::Bar"), ModuleOutcome::Planned);
        assert!(f.ui.has_message("[DRY RUN] Would install: libfoo-bar-perl"));
        assert_eq!(
            f.runner.commands(),
            vec!["dpkg -l libfoo-bar-perl", "perl -MFoo::Bar -e 1"]
        );
        assert!(f.registry.lookups.borrow().is_empty());
    }

    #[test]
    fn native_install_success() {
        let mut f = Fixture::new(FakeRunner::new().on("apt-get install -y", Reply::Succeed));

        assert_eq!(f.resolve("Moose"), ModuleOutcome::InstalledNative);
        assert!(f.ui.has_success("Successfully installed: Moose"));
        let options = f.runner.options_for("apt-get install -y libmoose-perl").unwrap();
        assert_eq!(options.timeout, Some(Duration::from_secs(300)));
    }

    #[test]
    fn not_found_natively_and_on_cpan() {
        let mut f = Fixture::new(
            FakeRunner::new().on("apt-get install -y", Reply::stderr(APT_NOT_FOUND)),
        );

        assert_eq!(f.resolve("Foo::Bar"), ModuleOutcome::NotFound);
        assert!(f
            .ui
            .has_warning("Package not found in system repository: libfoo-bar-perl"));
        assert_eq!(*f.registry.lookups.borrow(), vec!["Foo::Bar".to_string()]);
        assert!(f.ui.prompts_shown().is_empty());
    }

    #[test]
    fn not_found_phrase_in_stdout_counts() {
        let mut f = Fixture::new(FakeRunner::new().on(
            "apt-get install -y",
            Reply::Fail {
                stdout: "No matching package to install: 'libfoo-perl'".to_string(),
                stderr: String::new(),
            },
        ));

        assert_eq!(f.resolve("Foo"), ModuleOutcome::NotFound);
    }

    #[test]
    fn registry_disabled_never_queries() {
        let mut f = Fixture::new(
            FakeRunner::new().on("apt-get install -y", Reply::stderr(APT_NOT_FOUND)),
        );
        f.config.use_registry = false;
        f.registry = FakeRegistry::new().with_module("Foo::Bar", "1.0");

        assert_eq!(f.resolve("Foo::Bar"), ModuleOutcome::SkippedNoRegistry);
        assert!(f.registry.lookups.borrow().is_empty());
    }

    #[test]
    fn registry_error_downgrades_to_not_found() {
        let mut f = Fixture::new(
            FakeRunner::new().on("apt-get install -y", Reply::stderr(APT_NOT_FOUND)),
        );
        f.registry = FakeRegistry::unreachable();

        assert_eq!(f.resolve("Foo::Bar"), ModuleOutcome::NotFound);
        assert!(f.ui.has_warning("connection refused"));
        assert!(f.ui.errors().is_empty());
    }

    #[test]
    fn declined_registry_install_is_user_skipped() {
        let mut f = Fixture::new(
            FakeRunner::new().on("apt-get install -y", Reply::stderr(APT_NOT_FOUND)),
        );
        f.registry = FakeRegistry::new().with_module("Foo::Bar", "2.01");
        f.host = FakeHost::debian_root().with_tools(&["cpanm"]);
        f.ui.set_prompt_response("cpan-install-Foo::Bar", false);

        assert_eq!(f.resolve("Foo::Bar"), ModuleOutcome::SkippedByUser);
        assert_eq!(f.ui.prompts_shown(), &["cpan-install-Foo::Bar".to_string()]);
        assert!(!f.runner.ran("cpanm"));
    }

    #[test]
    fn accepted_registry_install_uses_cpanm() {
        let mut f = Fixture::new(
            FakeRunner::new()
                .on("apt-get install -y", Reply::stderr(APT_NOT_FOUND))
                .on("cpanm Foo::Bar", Reply::Succeed),
        );
        f.registry = FakeRegistry::new().with_module("Foo::Bar", "2.01");
        f.host = FakeHost::debian_root().with_tools(&["cpanm", "cpan"]);
        f.ui.set_prompt_response("cpan-install-Foo::Bar", true);

        assert_eq!(f.resolve("Foo::Bar"), ModuleOutcome::InstalledViaRegistry);
        let options = f.runner.options_for("cpanm Foo::Bar").unwrap();
        assert_eq!(options.timeout, Some(Duration::from_secs(900)));
        assert!(!f.runner.ran("cpan -i"));
    }

    #[test]
    fn assume_yes_installs_with_cpan_without_prompting() {
        let mut f = Fixture::new(
            FakeRunner::new()
                .on("apt-get install -y", Reply::stderr(APT_NOT_FOUND))
                .on("cpan -i Foo::Bar", Reply::Succeed),
        );
        f.config.assume_yes = true;
        f.registry = FakeRegistry::new().with_module("Foo::Bar", "2.01");
        f.host = FakeHost::debian_root().with_tools(&["cpan"]);

        assert_eq!(f.resolve("Foo::Bar"), ModuleOutcome::InstalledViaRegistry);
        assert!(f.ui.prompts_shown().is_empty());
        let options = f.runner.options_for("cpan -i Foo::Bar").unwrap();
        assert_eq!(
            options.env.get("PERL_MM_USE_DEFAULT").map(String::as_str),
            Some("1")
        );
    }

    #[test]
    fn no_registry_installer_fails() {
        let mut f = Fixture::new(
            FakeRunner::new().on("apt-get install -y", Reply::stderr(APT_NOT_FOUND)),
        );
        f.config.assume_yes = true;
        f.registry = FakeRegistry::new().with_module("Foo::Bar", "2.01");

        let outcome = f.resolve("Foo::Bar");

        assert!(matches!(outcome, ModuleOutcome::Failed { reason } if reason.contains("neither cpanm nor cpan")));
    }

    #[test]
    fn registry_install_requires_privilege() {
        let mut f = Fixture::new(
            FakeRunner::new().on("apt-get install -y", Reply::stderr(APT_NOT_FOUND)),
        );
        f.config.assume_yes = true;
        f.registry = FakeRegistry::new().with_module("Foo::Bar", "2.01");
        f.host = FakeHost::debian_root().with_tools(&["cpanm"]).unprivileged();

        assert!(f.resolve("Foo::Bar").is_failure());
        assert!(!f.runner.ran("cpanm"));
        assert!(f.ui.has_error("must be run as root"));
    }

    #[test]
    fn failed_registry_install_is_failed() {
        let mut f = Fixture::new(
            FakeRunner::new()
                .on("apt-get install -y", Reply::stderr(APT_NOT_FOUND))
                .on("cpanm", Reply::stderr("! Installing Foo::Bar failed. See build.log")),
        );
        f.config.assume_yes = true;
        f.registry = FakeRegistry::new().with_module("Foo::Bar", "2.01");
        f.host = FakeHost::debian_root().with_tools(&["cpanm"]);

        let outcome = f.resolve("Foo::Bar");

        assert!(matches!(outcome, ModuleOutcome::Failed { reason } if reason.contains("build.log")));
    }

    #[test]
    fn other_native_failure_is_failed() {
        let mut f = Fixture::new(FakeRunner::new().on(
            "apt-get install -y",
            Reply::stderr("E: Could not get lock /var/lib/dpkg/lock-frontend"),
        ));

        let outcome = f.resolve("Moose");

        assert!(outcome.is_failure());
        assert!(f.registry.lookups.borrow().is_empty());
        assert!(f.ui.has_error("Could not get lock"));
    }

    #[test]
    fn native_install_timeout_is_failed() {
        let mut f = Fixture::new(FakeRunner::new().on("apt-get install -y", Reply::TimeOut));

        let outcome = f.resolve("Moose");

        assert!(matches!(outcome, ModuleOutcome::Failed { reason } if reason.contains("timed out after 300s")));
    }

    #[test]
    fn runtime_probe_timeout_fails_without_installing() {
        let mut f = Fixture::new(
            FakeRunner::new()
                .on("perl", Reply::TimeOut)
                .on("apt-get install -y", Reply::Succeed),
        );

        let outcome = f.resolve("Slow");

        assert!(matches!(outcome, ModuleOutcome::Failed { reason } if reason.contains("timed out after 10s")));
        assert_eq!(
            f.runner.commands(),
            vec!["dpkg -l libslow-perl", "perl -MSlow -e 1"]
        );
        assert!(f.ui.has_error("Could not check Slow"));
    }

    #[test]
    fn native_query_timeout_fails_before_runtime_probe() {
        let mut f = Fixture::new(
            FakeRunner::new()
                .on("dpkg", Reply::TimeOut)
                .on("apt-get install -y", Reply::Succeed),
        );

        let outcome = f.resolve("Moose");

        assert!(matches!(outcome, ModuleOutcome::Failed { reason } if reason.contains("timed out after 5s")));
        assert!(!f.runner.ran("perl"));
        assert!(!f.runner.ran("apt-get"));
    }

    #[test]
    fn probe_timeout_fails_even_in_dry_run() {
        let mut f = Fixture::new(FakeRunner::new().on("perl", Reply::TimeOut));
        f.config.dry_run = true;

        assert!(f.resolve("Slow").is_failure());
    }

    #[test]
    fn not_found_phrases_are_case_insensitive() {
        let result = CommandResult::failure(
            Some(1),
            String::new(),
            "error: target NOT FOUND: libfoo-perl".to_string(),
            Duration::ZERO,
        );
        assert!(is_not_found_output(&result));

        let other = CommandResult::failure(Some(1), String::new(), "disk full".into(), Duration::ZERO);
        assert!(!is_not_found_output(&other));
    }

    #[test]
    fn failure_detail_prefers_last_stderr_line() {
        let result = CommandResult::failure(
            Some(100),
            String::new(),
            "Reading package lists...\nE: broken packages\n\n".to_string(),
            Duration::ZERO,
        );
        assert_eq!(failure_detail(&result), "E: broken packages");

        let silent = CommandResult::failure(Some(2), String::new(), String::new(), Duration::ZERO);
        assert_eq!(failure_detail(&silent), "exit code 2");
    }
}
