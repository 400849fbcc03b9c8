//! CLI argument definitions.
//!
//! The entry point is the [`Cli`] struct, parsed with clap's derive macros.

use clap::Parser;
use std::path::PathBuf;

use crate::registry::DEFAULT_REGISTRY_URL;

const EXAMPLES: &str = "\
Examples:
  sudo install-cpan-modules                          # Look for cpanfile in current directory
  sudo install-cpan-modules /path/to/directory       # Look for cpanfile in specified directory
  sudo install-cpan-modules /path/to/cpanfile        # Use specified cpanfile directly
  sudo install-cpan-modules --log-file install.log   # Log output to file
  install-cpan-modules --dry-run                     # Show what would be installed without installing";

/// Find and parse a cpanfile, then install the Perl modules it requires.
#[derive(Debug, Parser)]
#[command(name = "install-cpan-modules")]
#[command(author, version, about, long_about = None)]
#[command(after_help = EXAMPLES)]
pub struct Cli {
    /// Path to cpanfile or directory containing cpanfile
    pub path: Option<PathBuf>,

    /// Append a log of the run to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Show what would be installed without actually installing
    #[arg(long)]
    pub dry_run: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long)]
    pub assume_yes: bool,

    /// Never fall back to installing from CPAN
    #[arg(long, conflicts_with = "install_cpanm")]
    pub no_cpan: bool,

    /// Install cpanm through cpan first if it is missing
    #[arg(long)]
    pub install_cpanm: bool,

    /// Base URL of the MetaCPAN API
    #[arg(
        long,
        value_name = "URL",
        env = "CPAN_INSTALLER_REGISTRY_URL",
        default_value = DEFAULT_REGISTRY_URL
    )]
    pub registry_url: String,

    /// Show verbose output, including output of failed commands
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}
