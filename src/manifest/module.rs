//! Perl module names and native package name derivation.

use std::fmt;

/// Prefix used by Debian-style Perl module packages.
const PACKAGE_PREFIX: &str = "lib";
/// Suffix used by Debian-style Perl module packages.
const PACKAGE_SUFFIX: &str = "-perl";

/// A module required by the cpanfile, e.g. `JSON::XS`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleName(String);

impl ModuleName {
    /// Wrap a module name as found in the cpanfile.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The module name as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Guess the native package that ships this module.
    ///
    /// `Foo::Bar` becomes `libfoo-bar-perl`. This follows Debian naming and is
    /// not verified against any repository, so other distributions may miss.
    pub fn native_package_name(&self) -> String {
        format!(
            "{}{}{}",
            PACKAGE_PREFIX,
            self.0.to_lowercase().replace("::", "-"),
            PACKAGE_SUFFIX
        )
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}
