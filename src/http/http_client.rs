// Copyright 2025 The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

use std::time::Duration;

use async_trait::async_trait;
use log::trace;
use url::Url;

use super::error::TransportError;

/// Header carrying the node API version the client speaks.
pub const API_VERSION_HEADER: &str = "X-IOTA-API-Version";
pub const API_VERSION: &str = "1";

/// Headers sent with every command.
pub const REQUEST_HEADERS: [(&str, &str); 2] = [("Content-Type", "application/json"), (API_VERSION_HEADER, API_VERSION)];

/// Delivers one encoded request to the node and returns the response body.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, url: &Url, headers: &[(&str, &str)], body: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}

/// [`Transport`] over a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport without a request timeout.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    /// Creates a transport that abandons a request after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, url: &Url, headers: &[(&str, &str)], body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let mut req = self.client.post(url.clone());
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let resp = req.body(body).send().await?;
        trace!(status = resp.status().as_u16(); "HTTP: Node responded");

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".into());
            return Err(TransportError::ServerError { status, body });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}
