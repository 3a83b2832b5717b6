// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport.

use reqwest::{Client, StatusCode};

use crate::error::{ProtocolError, Result};
use crate::protocol::{HttpConfig, ResponseFields};

impl HttpConfig {
    /// Creates a [`BrpHttpClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> std::result::Result<BrpHttpClient, ProtocolError> {
        BrpHttpClient::new(&self)
    }
}

/// HTTP client for one adapter.
///
/// # Examples
///
/// ```no_run
/// use daikin_climate::protocol::HttpConfig;
///
/// # async fn example() -> daikin_climate::Result<()> {
/// let client = HttpConfig::new("192.168.1.40").into_client()?;
/// let info = client.get("/common/basic_info", &[]).await?;
/// println!("mac: {:?}", info.get("mac"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BrpHttpClient {
    base_url: String,
    client: Client,
}

impl BrpHttpClient {
    /// Creates a client for the configured adapter.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &HttpConfig) -> std::result::Result<Self, ProtocolError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self {
            base_url: config.base_url(),
            client,
        })
    }

    /// Returns the base URL of the adapter.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL for a resource and its query parameters.
    fn build_url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut url = format!("{}{path}", self.base_url);
        for (i, (key, value)) in query.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    /// Requests a resource and returns its `OK` reply.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::AuthenticationFailed`] on HTTP 403, a
    /// connection error on any other non-success status or transport
    /// failure, a parse error for a malformed body and
    /// [`DeviceError::CommandRejected`](crate::error::DeviceError::CommandRejected)
    /// when the reply is not `ret=OK`.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<ResponseFields> {
        let url = self.build_url(path, query);

        tracing::debug!(url = %url, "Sending HTTP request");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::UNAUTHORIZED {
            return Err(ProtocolError::AuthenticationFailed.into());
        }
        if !status.is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            ))
            .into());
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(body = %body, "Received HTTP response");

        ResponseFields::parse(&body)?.ensure_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BrpHttpClient {
        HttpConfig::new("192.168.1.40").into_client().unwrap()
    }

    #[test]
    fn build_url_without_query() {
        assert_eq!(
            client().build_url("/common/basic_info", &[]),
            "http://192.168.1.40/common/basic_info"
        );
    }

    #[test]
    fn build_url_encodes_values() {
        let url = client().build_url(
            "/aircon/set_control_info",
            &[("pow", "1"), ("mode", "3"), ("stemp", "21.5"), ("name", "a b")],
        );
        assert_eq!(
            url,
            "http://192.168.1.40/aircon/set_control_info?pow=1&mode=3&stemp=21.5&name=a%20b"
        );
    }

    #[test]
    fn base_url_follows_config() {
        let client = HttpConfig::new("aircon.local").with_port(8080).into_client().unwrap();
        assert_eq!(client.base_url(), "http://aircon.local:8080");
    }
}
