//! CPAN module registry lookups.
//!
//! The resolution engine asks a [`RegistryClient`] whether a module exists
//! before offering a registry install. [`MetaCpanClient`] is the real
//! implementation.

pub mod metacpan;

pub use metacpan::{MetaCpanClient, DEFAULT_REGISTRY_URL};

use serde::{Deserialize, Deserializer};

use crate::error::Result;

/// What the registry knows about a module.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModuleRecord {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub version: Option<String>,
    pub author: Option<String>,
    #[serde(rename = "abstract")]
    pub summary: Option<String>,
    pub distribution: Option<String>,
}

impl ModuleRecord {
    /// Version for display, `unknown` when absent.
    pub fn version_label(&self) -> &str {
        self.version.as_deref().unwrap_or("unknown")
    }
}

/// Capability for querying the module registry.
pub trait RegistryClient {
    /// Look a module up. `Ok(None)` means the registry has no such module.
    fn lookup(&self, module: &str) -> Result<Option<ModuleRecord>>;
}

// MetaCPAN reports most versions as strings but some as bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
