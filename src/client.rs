use reqwest::blocking::{Client, ClientBuilder};
use std::time::Duration;

/// Default Brightkite API host
pub const SERVER: &str = "apps.brightkite.com";

/// Create the default HTTP client for API requests
/// with settings for connection pooling and timeouts
pub fn create_rest_client() -> Client {
    ClientBuilder::new()
        .pool_max_idle_per_host(1)
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create HTTP client")
}

/// Connection configuration for the Brightkite API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL scheme (http or https)
    pub scheme: String,
    /// API host
    pub host: String,
    /// Enable debug logging
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            scheme: "https".to_string(),
            host: SERVER.to_string(),
            debug: false,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with the given scheme and host
    pub fn new(scheme: String, host: String) -> Self {
        ClientConfig {
            scheme,
            host,
            debug: false,
        }
    }

    /// Connect to the default host over plain HTTP instead of HTTPS
    pub fn insecure() -> Self {
        ClientConfig::new("http".to_string(), SERVER.to_string())
    }

    /// Set debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.scheme, "https");
        assert_eq!(config.host, SERVER);
        assert!(!config.debug);
        assert_eq!(config.base_url(), "https://apps.brightkite.com");
    }

    #[test]
    fn test_insecure_config() {
        let config = ClientConfig::insecure();
        assert_eq!(config.base_url(), "http://apps.brightkite.com");
    }

    #[test]
    fn test_custom_config() {
        let config = ClientConfig::new("http".to_string(), "localhost:8080".to_string()).with_debug(true);
        assert_eq!(config.base_url(), "http://localhost:8080");
        assert!(config.debug);
    }
}
