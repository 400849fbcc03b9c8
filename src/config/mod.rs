//! Run configuration.
//!
//! [`RunConfig`] is resolved once from the command line and never changes
//! during a run. [`Timeouts`] holds the deadline for every kind of external
//! invocation.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::registry::DEFAULT_REGISTRY_URL;

/// Deadlines for external invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Native package queries.
    pub query: Duration,
    /// `perl -M<Module> -e 1`.
    pub runtime_probe: Duration,
    /// MetaCPAN HTTP requests.
    pub registry_http: Duration,
    /// Native package install.
    pub native_install: Duration,
    /// `cpanm`/`cpan` module install.
    pub registry_install: Duration,
    /// `cpan -i App::cpanminus`.
    pub helper_install: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            query: Duration::from_secs(5),
            runtime_probe: Duration::from_secs(10),
            registry_http: Duration::from_secs(10),
            native_install: Duration::from_secs(300),
            registry_install: Duration::from_secs(900),
            helper_install: Duration::from_secs(600),
        }
    }
}

/// Immutable settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Path given on the command line, if any.
    pub manifest_path: Option<PathBuf>,
    /// File the run log is appended to.
    pub log_file: Option<PathBuf>,
    /// Report what would happen without installing anything.
    pub dry_run: bool,
    /// Answer yes to every confirmation.
    pub assume_yes: bool,
    /// Whether modules missing natively may come from CPAN.
    pub use_registry: bool,
    /// Bootstrap cpanm before resolving modules.
    pub install_helper: bool,
    /// MetaCPAN API base URL.
    pub registry_url: String,
    pub timeouts: Timeouts,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            manifest_path: None,
            log_file: None,
            dry_run: false,
            assume_yes: false,
            use_registry: true,
            install_helper: false,
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            timeouts: Timeouts::default(),
        }
    }
}

impl RunConfig {
    /// Resolve the configuration from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            manifest_path: cli.path.clone(),
            log_file: cli.log_file.clone(),
            dry_run: cli.dry_run,
            assume_yes: cli.assume_yes,
            use_registry: !cli.no_cpan,
            install_helper: cli.install_cpanm,
            registry_url: cli.registry_url.trim_end_matches('/').to_string(),
            timeouts: Timeouts::default(),
        }
    }

    /// Whether the plan needs an explicit yes before anything is installed.
    pub fn needs_plan_confirmation(&self) -> bool {
        !self.dry_run && !self.assume_yes
    }

    /// Whether the run needs root.
    pub fn requires_privilege(&self) -> bool {
        !self.dry_run
    }
}
