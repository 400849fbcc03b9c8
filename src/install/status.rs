//! Per-module resolution outcomes.

use std::fmt;

/// Final result of resolving one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleOutcome {
    /// The native package was already installed.
    AlreadySatisfiedNative,
    /// Perl could already load the module.
    AlreadySatisfiedRuntime,
    /// Installed through the native package manager.
    InstalledNative,
    /// Installed through cpanm or cpan.
    InstalledViaRegistry,
    /// Neither the native repository nor the registry has it.
    NotFound,
    /// Missing natively and the registry fallback is disabled.
    SkippedNoRegistry,
    /// The user declined the registry install.
    SkippedByUser,
    /// Would have been installed natively (dry run).
    Planned,
    /// Any other failure.
    Failed { reason: String },
}

/// Summary bucket an outcome is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeBucket {
    Installed,
    AlreadySatisfied,
    NotFound,
    UserSkipped,
    Planned,
    Failed,
}

impl ModuleOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Bucket for the run summary. Every outcome maps to exactly one.
    pub fn bucket(&self) -> OutcomeBucket {
        match self {
            Self::AlreadySatisfiedNative | Self::AlreadySatisfiedRuntime => {
                OutcomeBucket::AlreadySatisfied
            }
            Self::InstalledNative | Self::InstalledViaRegistry => OutcomeBucket::Installed,
            Self::NotFound | Self::SkippedNoRegistry => OutcomeBucket::NotFound,
            Self::SkippedByUser => OutcomeBucket::UserSkipped,
            Self::Planned => OutcomeBucket::Planned,
            Self::Failed { .. } => OutcomeBucket::Failed,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl fmt::Display for ModuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySatisfiedNative => f.write_str("already installed (native package)"),
            Self::AlreadySatisfiedRuntime => f.write_str("already installed (loadable by perl)"),
            Self::InstalledNative => f.write_str("installed (native package)"),
            Self::InstalledViaRegistry => f.write_str("installed (CPAN)"),
            Self::NotFound => f.write_str("not found"),
            Self::SkippedNoRegistry => f.write_str("not found (CPAN fallback disabled)"),
            Self::SkippedByUser => f.write_str("skipped by user"),
            Self::Planned => f.write_str("would install (dry run)"),
            Self::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}
