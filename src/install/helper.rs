//! CPAN install helpers: `cpanm`, `cpan`, and the cpanm bootstrap.

use crate::config::RunConfig;
use crate::detection::Host;
use crate::manifest::ModuleName;
use crate::report::Reporter;
use crate::shell::{CommandOptions, CommandRunner};

/// Distribution that provides `cpanm`.
pub const HELPER_DISTRIBUTION: &str = "App::cpanminus";

/// Makes the `cpan` shell accept its configuration defaults without asking.
const CPAN_DEFAULTS_ENV: (&str, &str) = ("PERL_MM_USE_DEFAULT", "1");

/// The tool used to install a module from CPAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryInstaller {
    Cpanm,
    Cpan,
    Unavailable,
}

impl RegistryInstaller {
    /// Prefer `cpanm`, then `cpan`.
    pub fn select(host: &dyn Host) -> Self {
        if host.find_executable("cpanm").is_some() {
            Self::Cpanm
        } else if host.find_executable("cpan").is_some() {
            Self::Cpan
        } else {
            Self::Unavailable
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cpanm => "cpanm",
            Self::Cpan => "cpan",
            Self::Unavailable => "none",
        }
    }

    /// Command line and environment for installing `module`.
    pub fn command(&self, module: &ModuleName) -> Option<(String, CommandOptions)> {
        match self {
            Self::Cpanm => Some((format!("cpanm {}", module), CommandOptions::default())),
            Self::Cpan => Some((
                format!("cpan -i {}", module),
                CommandOptions::default().env(CPAN_DEFAULTS_ENV.0, CPAN_DEFAULTS_ENV.1),
            )),
            Self::Unavailable => None,
        }
    }
}

/// What the cpanm bootstrap did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelperBootstrap {
    /// Not requested, dry run, or registry disabled.
    NotApplicable,
    /// cpanm was already on PATH.
    AlreadyPresent,
    Installed,
    Failed { reason: String },
}

/// Install cpanm through cpan when requested and missing.
///
/// Runs at most once per run, before any module is resolved. Failure is
/// reported and the run carries on with whatever helper is available.
pub fn bootstrap_cpanm(
    config: &RunConfig,
    host: &dyn Host,
    runner: &dyn CommandRunner,
    reporter: &mut Reporter<'_>,
) -> HelperBootstrap {
    if !config.install_helper || config.dry_run || !config.use_registry {
        return HelperBootstrap::NotApplicable;
    }
    if host.find_executable("cpanm").is_some() {
        reporter.debug("cpanm already available");
        return HelperBootstrap::AlreadyPresent;
    }
    if host.find_executable("cpan").is_none() {
        let reason = "cpan is not available to install cpanm".to_string();
        reporter.warning(&format!("Could not install cpanm: {}", reason));
        return HelperBootstrap::Failed { reason };
    }

    let command = format!("cpan -i {}", HELPER_DISTRIBUTION);
    let options = CommandOptions::with_timeout(config.timeouts.helper_install)
        .env(CPAN_DEFAULTS_ENV.0, CPAN_DEFAULTS_ENV.1);

    reporter.info(&format!("Installing cpanm ({})...", HELPER_DISTRIBUTION));
    let mut spinner = reporter.start_spinner(&format!("Installing {}", HELPER_DISTRIBUTION));

    match runner.run(&command, &options) {
        Ok(result) if result.success => {
            spinner.finish_success("Installed cpanm");
            reporter.success("Installed cpanm");
            HelperBootstrap::Installed
        }
        Ok(result) => {
            spinner.finish_error("Failed to install cpanm");
            reporter.command_output(&command, &result);
            let reason = format!("cpan exited with code {:?}", result.exit_code);
            reporter.warning(&format!("Could not install cpanm: {}", reason));
            HelperBootstrap::Failed { reason }
        }
        Err(e) => {
            spinner.finish_error("Failed to install cpanm");
            let reason = e.to_string();
            reporter.warning(&format!("Could not install cpanm: {}", reason));
            HelperBootstrap::Failed { reason }
        }
    }
}
