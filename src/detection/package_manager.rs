//! Package manager detection.

use std::fmt;

use super::host::Host;
use super::os_release::distribution_ids;
use crate::error::{InstallerError, Result};

/// Native package managers the installer can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Yum,
    Dnf,
    Pacman,
    Zypper,
    Apk,
    Homebrew,
}

/// Distribution IDs from os-release mapped to their package manager.
const DISTRIBUTIONS: &[(&str, PackageManager)] = &[
    ("debian", PackageManager::Apt),
    ("ubuntu", PackageManager::Apt),
    ("raspbian", PackageManager::Apt),
    ("rhel", PackageManager::Yum),
    ("centos", PackageManager::Yum),
    ("fedora", PackageManager::Dnf),
    ("arch", PackageManager::Pacman),
    ("manjaro", PackageManager::Pacman),
    ("opensuse", PackageManager::Zypper),
    ("alpine", PackageManager::Apk),
];

/// Executables probed on PATH when os-release gives no answer, in order.
const PATH_PROBES: &[(&str, PackageManager)] = &[
    ("apt", PackageManager::Apt),
    ("apt-get", PackageManager::Apt),
    ("yum", PackageManager::Yum),
    ("dnf", PackageManager::Dnf),
    ("pacman", PackageManager::Pacman),
    ("zypper", PackageManager::Zypper),
    ("apk", PackageManager::Apk),
];

impl PackageManager {
    /// Short identifier, e.g. `apt`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Apt => "apt",
            Self::Yum => "yum",
            Self::Dnf => "dnf",
            Self::Pacman => "pacman",
            Self::Zypper => "zypper",
            Self::Apk => "apk",
            Self::Homebrew => "brew",
        }
    }

    /// Install invocation the package name is appended to.
    ///
    /// Output is captured and stdin is closed, so every template runs
    /// without confirmation prompts.
    pub fn install_template(&self) -> &'static str {
        match self {
            Self::Apt => "apt-get install -y",
            Self::Yum => "yum install -y",
            Self::Dnf => "dnf install -y",
            Self::Pacman => "pacman -S --noconfirm",
            Self::Zypper => "zypper --non-interactive install",
            Self::Apk => "apk add",
            Self::Homebrew => "brew install",
        }
    }

    /// Command that exits zero when `package` is installed, if the manager
    /// has one that fits the derived package names.
    pub fn query_command(&self, package: &str) -> Option<String> {
        match self {
            Self::Apt => Some(format!("dpkg -l {}", package)),
            Self::Yum | Self::Dnf => Some(format!("rpm -q {}", package)),
            Self::Pacman => Some(format!("pacman -Q {}", package)),
            Self::Zypper => Some(format!("zypper se --installed-only {}", package)),
            Self::Apk => Some(format!("apk info -e {}", package)),
            Self::Homebrew => None,
        }
    }

    /// Look up a distribution ID, accepting variants like `opensuse-leap`.
    pub fn for_distribution(id: &str) -> Option<Self> {
        DISTRIBUTIONS.iter().find_map(|(distro, manager)| {
            let matches = id == *distro
                || id
                    .strip_prefix(distro)
                    .is_some_and(|rest| rest.starts_with('-'));
            matches.then_some(*manager)
        })
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which detection strategy selected the package manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionSource {
    /// Matched a distribution ID from os-release.
    OsRelease { distribution: String },
    /// Darwin kernel.
    Darwin,
    /// Found an executable on PATH.
    PathProbe { executable: String },
}

/// The package manager chosen for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManagerProfile {
    pub manager: PackageManager,
    pub source: DetectionSource,
}

impl PackageManagerProfile {
    /// Full install command for one package.
    pub fn install_command(&self, package: &str) -> String {
        format!("{} {}", self.manager.install_template(), package)
    }
}

/// Detect the host's package manager.
///
/// Strategies in priority order: os-release distribution table, Darwin,
/// PATH probe. The first that succeeds wins.
pub fn detect(host: &dyn Host) -> Result<PackageManagerProfile> {
    if let Some(content) = host.os_release() {
        for id in distribution_ids(&content) {
            if let Some(manager) = PackageManager::for_distribution(&id) {
                tracing::debug!("os-release id '{}' maps to {}", id, manager);
                return Ok(PackageManagerProfile {
                    manager,
                    source: DetectionSource::OsRelease { distribution: id },
                });
            }
        }
    }

    if host.is_darwin() {
        return Ok(PackageManagerProfile {
            manager: PackageManager::Homebrew,
            source: DetectionSource::Darwin,
        });
    }

    for (executable, manager) in PATH_PROBES {
        if host.find_executable(executable).is_some() {
            tracing::debug!("found {} on PATH", executable);
            return Ok(PackageManagerProfile {
                manager: *manager,
                source: DetectionSource::PathProbe {
                    executable: executable.to_string(),
                },
            });
        }
    }

    Err(InstallerError::NoPackageManagerDetected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[derive(Default)]
    struct FakeHost {
        os_release: Option<String>,
        darwin: bool,
        on_path: Vec<&'static str>,
    }

    impl Host for FakeHost {
        fn os_release(&self) -> Option<String> {
            self.os_release.clone()
        }

        fn is_darwin(&self) -> bool {
            self.darwin
        }

        fn find_executable(&self, name: &str) -> Option<PathBuf> {
            self.on_path
                .contains(&name)
                .then(|| PathBuf::from("/usr/bin").join(name))
        }

        fn is_elevated(&self) -> bool {
            true
        }
    }

    fn host_with_release(content: &str) -> FakeHost {
        FakeHost {
            os_release: Some(content.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn detects_apt_from_ubuntu() {
        let host = host_with_release("ID=ubuntu\nID_LIKE=debian\n");

        let profile = detect(&host).unwrap();

        assert_eq!(profile.manager, PackageManager::Apt);
        assert_eq!(
            profile.source,
            DetectionSource::OsRelease {
                distribution: "ubuntu".to_string()
            }
        );
    }

    #[test]
    fn falls_back_to_id_like() {
        let host = host_with_release("ID=\"rocky\"\nID_LIKE=\"rhel centos fedora\"\n");

        let profile = detect(&host).unwrap();

        assert_eq!(profile.manager, PackageManager::Yum);
    }

    #[test]
    fn matches_suffixed_distribution_ids() {
        let host = host_with_release("ID=\"opensuse-tumbleweed\"\nID_LIKE=\"opensuse suse\"\n");

        assert_eq!(detect(&host).unwrap().manager, PackageManager::Zypper);
    }

    #[test]
    fn does_not_match_id_prefix_without_separator() {
        assert_eq!(PackageManager::for_distribution("archlinuxarm"), None);
        assert_eq!(
            PackageManager::for_distribution("arch"),
            Some(PackageManager::Pacman)
        );
    }

    #[test]
    fn os_release_beats_darwin_and_path() {
        let host = FakeHost {
            os_release: Some("ID=alpine\n".to_string()),
            darwin: true,
            on_path: vec!["apt"],
        };

        assert_eq!(detect(&host).unwrap().manager, PackageManager::Apk);
    }

    #[test]
    fn darwin_selects_homebrew() {
        let host = FakeHost {
            darwin: true,
            on_path: vec!["apt"],
            ..Default::default()
        };

        let profile = detect(&host).unwrap();

        assert_eq!(profile.manager, PackageManager::Homebrew);
        assert_eq!(profile.source, DetectionSource::Darwin);
    }

    #[test]
    fn unknown_distribution_falls_through_to_path_probe() {
        let host = FakeHost {
            os_release: Some("ID=gentoo\n".to_string()),
            on_path: vec!["dnf", "pacman"],
            ..Default::default()
        };

        let profile = detect(&host).unwrap();

        assert_eq!(profile.manager, PackageManager::Dnf);
        assert_eq!(
            profile.source,
            DetectionSource::PathProbe {
                executable: "dnf".to_string()
            }
        );
    }

    #[test]
    fn apt_get_alone_maps_to_apt() {
        let host = FakeHost {
            on_path: vec!["apt-get"],
            ..Default::default()
        };

        assert_eq!(detect(&host).unwrap().manager, PackageManager::Apt);
    }

    #[test]
    fn nothing_detected_is_an_error() {
        let err = detect(&FakeHost::default()).unwrap_err();

        assert!(matches!(err, InstallerError::NoPackageManagerDetected));
    }

    #[test]
    fn install_command_appends_package() {
        let profile = PackageManagerProfile {
            manager: PackageManager::Apt,
            source: DetectionSource::Darwin,
        };

        assert_eq!(
            profile.install_command("libjson-xs-perl"),
            "apt-get install -y libjson-xs-perl"
        );
    }

    #[test]
    fn query_commands_per_family() {
        assert_eq!(
            PackageManager::Apt.query_command("libfoo-perl").as_deref(),
            Some("dpkg -l libfoo-perl")
        );
        assert_eq!(
            PackageManager::Dnf.query_command("libfoo-perl").as_deref(),
            Some("rpm -q libfoo-perl")
        );
        assert_eq!(
            PackageManager::Pacman.query_command("libfoo-perl").as_deref(),
            Some("pacman -Q libfoo-perl")
        );
        assert_eq!(PackageManager::Homebrew.query_command("libfoo-perl"), None);
    }
}
