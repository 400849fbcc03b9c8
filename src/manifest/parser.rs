//! Cpanfile parsing.
//!
//! Only `requires`/`require` lines are read. Everything else (version
//! constraints, `on 'test' => sub { ... }` blocks, features, comments) is
//! ignored without validation.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::module::ModuleName;
use crate::error::{InstallerError, Result};

static REQUIRES_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^requires?\s+['"]?([A-Za-z0-9:_-]+)['"]?"#).expect("valid requires regex")
});

/// A parsed cpanfile.
#[derive(Debug, Clone)]
pub struct Manifest {
    /// Where the cpanfile was read from.
    pub path: std::path::PathBuf,
    /// Required modules in file order, duplicates kept.
    pub modules: Vec<ModuleName>,
}

/// Extract required module names from cpanfile contents.
pub fn parse(content: &str) -> Vec<ModuleName> {
    content
        .lines()
        .filter_map(|line| REQUIRES_LINE.captures(line.trim_start()))
        .filter_map(|caps| caps.get(1))
        .map(|m| ModuleName::new(m.as_str()))
        .collect()
}

/// Read and parse a cpanfile, failing when it declares no modules.
pub fn load(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)?;
    let modules = parse(&content);

    if modules.is_empty() {
        return Err(InstallerError::InvalidManifest {
            path: path.to_path_buf(),
        });
    }

    Ok(Manifest {
        path: path.to_path_buf(),
        modules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(modules: &[ModuleName]) -> Vec<&str> {
        modules.iter().map(|m| m.as_str()).collect()
    }

    #[test]
    fn parses_quoted_and_bare_requirements() {
        let content = "requires 'JSON::XS';\n\n# a comment\nrequire Foo::Bar;\n";

        assert_eq!(names(&parse(content)), vec!["JSON::XS", "Foo::Bar"]);
    }

    #[test]
    fn ignores_version_constraints() {
        let content = r#"requires "Moose", "2.2011";
requires 'DBI', '>= 1.6, < 2.0';"#;

        assert_eq!(names(&parse(content)), vec!["Moose", "DBI"]);
    }

    #[test]
    fn reads_indented_lines_inside_blocks() {
        let content = "on 'test' => sub {\n    requires 'Test::More', '0.98';\n};\n";

        assert_eq!(names(&parse(content)), vec!["Test::More"]);
    }

    #[test]
    fn skips_malformed_and_unrelated_lines() {
        let content = "\
requires 'Plack';
recommends 'JSON::PP';
requires_ok 'Nope';
# requires 'Commented::Out';
requires
conflicts 'Old::Thing';
test_requires 'Test::Deep';
requires 'Try::Tiny';
";

        assert_eq!(names(&parse(content)), vec!["Plack", "Try::Tiny"]);
    }

    #[test]
    fn preserves_duplicates_in_order() {
        let content = "requires 'A';\nrequires 'B';\nrequires 'A';\n";

        assert_eq!(names(&parse(content)), vec!["A", "B", "A"]);
    }

    #[test]
    fn accepts_hyphens_and_underscores() {
        let content = "requires 'My_Module::Sub-Part';\n";

        assert_eq!(names(&parse(content)), vec!["My_Module::Sub-Part"]);
    }

    #[test]
    fn well_formed_count_matches_extracted_count() {
        let good = ["requires 'A::B';", "require C;", "  requires \"D::E\";"];
        let bad = ["", "# requires 'X';", "suggests 'Y';", "on 'develop' => sub {", "};"];
        let content = good
            .iter()
            .chain(bad.iter())
            .copied()
            .collect::<Vec<_>>()
            .join("\n");

        assert_eq!(names(&parse(&content)), vec!["A::B", "C", "D::E"]);
    }

    #[test]
    fn load_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cpanfile");
        fs::write(&path, "requires 'Mojolicious';\n").unwrap();

        let manifest = load(&path).unwrap();

        assert_eq!(manifest.path, path);
        assert_eq!(names(&manifest.modules), vec!["Mojolicious"]);
    }

    #[test]
    fn load_rejects_empty_manifest() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cpanfile");
        fs::write(&path, "# nothing here\n").unwrap();

        let err = load(&path).unwrap_err();

        assert!(matches!(err, InstallerError::InvalidManifest { .. }));
    }

    #[test]
    fn load_surfaces_io_errors() {
        let temp = TempDir::new().unwrap();

        let err = load(&temp.path().join("cpanfile")).unwrap_err();

        assert!(matches!(err, InstallerError::Io(_)));
    }
}
