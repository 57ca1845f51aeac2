//! Configuration for the native probe binary.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "portal";

#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// tracing filter directive, overridden by RUST_LOG
    #[serde(default)]
    pub log_filter: Option<String>,
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl PortalConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            log_filter: None,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<PortalConfig> {
    let file = match path {
        Some(path) => ::config::File::from(path).required(true),
        None => ::config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let config = ::config::Config::builder()
        // Start with defaults
        .set_default("api_base_url", default_api_base_url())?
        .set_default("request_timeout_secs", default_request_timeout_secs())?
        .add_source(file)
        // Override with environment variables (PORTAL_API_BASE_URL, etc.)
        .add_source(
            ::config::Environment::with_prefix("PORTAL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    #[test]
    #[serial]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");
        // explicit paths must exist
        assert!(load_config(Some(&missing)).is_err());

        let config = PortalConfig::default();
        assert_eq!(config.api_base_url, "http://localhost:3000");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    #[serial]
    fn test_file_values_are_read() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "api_base_url = \"http://api.test:8080\"").unwrap();
        writeln!(file, "request_timeout_secs = 3").unwrap();
        writeln!(file, "log_filter = \"distribution_portal=trace\"").unwrap();

        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.api_base_url, "http://api.test:8080");
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.log_filter.as_deref(), Some("distribution_portal=trace"));
    }

    #[test]
    #[serial]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "request_timeout_secs = 3").unwrap();

        std::env::set_var("PORTAL_REQUEST_TIMEOUT_SECS", "25");
        let config = load_config(Some(file.path()));
        std::env::remove_var("PORTAL_REQUEST_TIMEOUT_SECS");

        assert_eq!(config.unwrap().request_timeout_secs, 25);
    }
}
