//! Connection settings for the catalog REST API.

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL of the server, e.g. `http://localhost:8080/geoserver`.
    pub service_url: String,
    pub username: String,
    pub password: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8080/geoserver".to_string(),
            username: "admin".to_string(),
            password: "geoserver".to_string(),
            timeout_secs: 30,
        }
    }
}

impl CatalogConfig {
    pub fn new(
        service_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            service_url: service_url.into(),
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    /// Load from `GEOSERVER_URL`, `GEOSERVER_USER`, `GEOSERVER_PASSWORD` and
    /// `GEOSERVER_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GEOSERVER_URL") {
            config.service_url = val;
        }
        if let Ok(val) = std::env::var("GEOSERVER_USER") {
            config.username = val;
        }
        if let Ok(val) = std::env::var("GEOSERVER_PASSWORD") {
            config.password = val;
        }
        if let Ok(val) = std::env::var("GEOSERVER_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                config.timeout_secs = secs;
            }
        }

        config
    }

    pub fn validate(&self) -> CatalogResult<()> {
        if !(self.service_url.starts_with("http://") || self.service_url.starts_with("https://")) {
            return Err(CatalogError::Config(format!(
                "service_url must be an http(s) URL, got '{}'",
                self.service_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(CatalogError::Config("timeout_secs must be > 0".to_string()));
        }
        Ok(())
    }

    /// Service URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.service_url.trim_end_matches('/')
    }
}
