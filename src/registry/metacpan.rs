//! MetaCPAN HTTP client.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;

use super::{ModuleRecord, RegistryClient};
use crate::error::{InstallerError, Result};

/// Public MetaCPAN API root.
pub const DEFAULT_REGISTRY_URL: &str = "https://fastapi.metacpan.org/v1";

/// Looks modules up through the MetaCPAN `/module/<name>` endpoint.
pub struct MetaCpanClient {
    client: Client,
    base_url: String,
}

impl MetaCpanClient {
    /// Create a client whose requests give up after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("install-cpan-modules/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL queried for a module.
    pub fn module_url(&self, module: &str) -> String {
        format!("{}/module/{}", self.base_url, module)
    }
}

impl RegistryClient for MetaCpanClient {
    fn lookup(&self, module: &str) -> Result<Option<ModuleRecord>> {
        let url = self.module_url(module);
        tracing::debug!("GET {}", url);

        let lookup_failed = |message: String| InstallerError::RegistryLookupFailed {
            module: module.to_string(),
            message,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| lookup_failed(format!("network error: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let record = response
                    .json::<ModuleRecord>()
                    .map_err(|e| lookup_failed(format!("invalid response: {}", e)))?;
                Ok(Some(record))
            }
            status => Err(lookup_failed(format!("HTTP {}", status.as_u16()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[test]
    fn module_url_strips_trailing_slash() {
        let client = MetaCpanClient::new("https://example.test/v1/", TIMEOUT).unwrap();
        assert_eq!(
            client.module_url("Foo::Bar"),
            "https://example.test/v1/module/Foo::Bar"
        );
    }

    #[test]
    fn lookup_returns_record_on_success() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/v1/module/JSON::XS");
            then.status(200).json_body(json!({
                "name": "JSON::XS",
                "version": "4.03",
                "author": "MLEHMANN",
                "abstract": "JSON serialising/deserialising",
                "distribution": "JSON-XS"
            }));
        });

        let client = MetaCpanClient::new(&server.url("/v1"), TIMEOUT).unwrap();
        let record = client.lookup("JSON::XS").unwrap().unwrap();

        mock.assert();
        assert_eq!(record.version_label(), "4.03");
        assert_eq!(record.author.as_deref(), Some("MLEHMANN"));
    }

    #[test]
    fn lookup_returns_none_on_404() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/module/Foo");
            then.status(404).json_body(json!({"code": 404, "message": "Not found"}));
        });

        let client = MetaCpanClient::new(&server.url("/v1"), TIMEOUT).unwrap();

        assert!(client.lookup("Foo").unwrap().is_none());
    }

    #[test]
    fn lookup_errors_on_server_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/module/Foo");
            then.status(503);
        });

        let client = MetaCpanClient::new(&server.url("/v1"), TIMEOUT).unwrap();
        let err = client.lookup("Foo").unwrap_err();

        assert!(matches!(err, InstallerError::RegistryLookupFailed { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn lookup_errors_on_malformed_json() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/module/Foo");
            then.status(200).body("<html>maintenance</html>");
        });

        let client = MetaCpanClient::new(&server.url("/v1"), TIMEOUT).unwrap();
        let err = client.lookup("Foo").unwrap_err();

        assert!(err.to_string().contains("invalid response"));
    }

    #[test]
    fn lookup_errors_when_unreachable() {
        let client = MetaCpanClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();

        let err = client.lookup("Foo").unwrap_err();

        assert!(matches!(err, InstallerError::RegistryLookupFailed { .. }));
    }
}
