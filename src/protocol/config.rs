// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection configuration for HTTP adapters.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Configuration for an adapter reachable over HTTP.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use daikin_climate::protocol::HttpConfig;
///
/// let config = HttpConfig::new("192.168.1.40")
///     .with_port(8080)
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "http://192.168.1.40:8080");
/// ```
///
/// Loaded from a file, the timeout is given in seconds:
///
/// ```
/// use daikin_climate::protocol::HttpConfig;
///
/// let config: HttpConfig = serde_json::from_str(r#"{ "host": "aircon.local" }"#).unwrap();
/// assert_eq!(config.port(), 80);
/// assert_eq!(config.timeout(), HttpConfig::DEFAULT_TIMEOUT);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpConfig {
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_timeout", deserialize_with = "duration_from_secs")]
    timeout: Duration,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration for the given host name or IP address.
    ///
    /// A host that already carries a scheme (`http://...`) is used verbatim
    /// as the base URL and the port setting is ignored.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.host.contains("://") {
            return self.host.trim_end_matches('/').to_string();
        }

        if self.port == Self::DEFAULT_PORT {
            format!("http://{}", self.host)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

fn default_port() -> u16 {
    HttpConfig::DEFAULT_PORT
}

fn default_timeout() -> Duration {
    HttpConfig::DEFAULT_TIMEOUT
}

fn duration_from_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = HttpConfig::new("192.168.1.40");
        assert_eq!(config.host(), "192.168.1.40");
        assert_eq!(config.port(), 80);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.base_url(), "http://192.168.1.40");
    }

    #[test]
    fn scheme_prefixed_host_is_verbatim() {
        let config = HttpConfig::new("http://127.0.0.1:4321/").with_port(8080);
        assert_eq!(config.base_url(), "http://127.0.0.1:4321");
    }

    #[test]
    fn deserialize_all_fields() {
        let config: HttpConfig =
            serde_json::from_str(r#"{ "host": "10.0.0.9", "port": 8080, "timeout": 3 }"#).unwrap();
        assert_eq!(config, HttpConfig::new("10.0.0.9").with_port(8080).with_timeout(Duration::from_secs(3)));
    }

    #[test]
    fn deserialize_requires_host() {
        assert!(serde_json::from_str::<HttpConfig>(r#"{ "port": 80 }"#).is_err());
    }
}
