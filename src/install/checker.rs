//! Installation state checks.
//!
//! A module counts as present when its native package is installed or when
//! perl can already load it. A non-zero exit or a probe that cannot be
//! started reads as "not present". A probe that runs past its deadline is
//! reported separately so the caller can fail the module.

use std::time::Duration;

use crate::config::Timeouts;
use crate::detection::PackageManager;
use crate::error::InstallerError;
use crate::manifest::ModuleName;
use crate::shell::{CommandOptions, CommandRunner};

/// What a single probe found.
#[derive(Debug)]
pub enum Presence {
    Present,
    Absent,
    /// The probe was killed at its deadline.
    TimedOut(InstallerError),
}

impl Presence {
    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present)
    }
}

/// Probes whether modules are already available.
pub struct InstallationChecker<'a> {
    runner: &'a dyn CommandRunner,
    timeouts: Timeouts,
}

impl<'a> InstallationChecker<'a> {
    pub fn new(runner: &'a dyn CommandRunner, timeouts: Timeouts) -> Self {
        Self { runner, timeouts }
    }

    /// Ask the package manager whether `package` is installed.
    ///
    /// Managers without a usable query always answer absent.
    pub fn native_installed(&self, manager: PackageManager, package: &str) -> Presence {
        let Some(command) = manager.query_command(package) else {
            return Presence::Absent;
        };
        self.probe(&command, self.timeouts.query)
    }

    /// Check whether perl can load the module.
    pub fn runtime_available(&self, module: &ModuleName) -> Presence {
        let command = runtime_probe_command(module);
        self.probe(&command, self.timeouts.runtime_probe)
    }

    fn probe(&self, command: &str, timeout: Duration) -> Presence {
        match self
            .runner
            .run(command, &CommandOptions::with_timeout(timeout))
        {
            Ok(result) if result.success => Presence::Present,
            Ok(_) => Presence::Absent,
            Err(e @ InstallerError::Timeout { .. }) => Presence::TimedOut(e),
            Err(e) => {
                tracing::debug!("probe '{}' did not complete: {}", command, e);
                Presence::Absent
            }
        }
    }
}

/// `perl -M<Module> -e 1`
pub fn runtime_probe_command(module: &ModuleName) -> String {
    format!("perl -M{} -e 1", module)
}
