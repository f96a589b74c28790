// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Thin wrapper around [`reqwest`] for posting bodies to relays and their successors.
//!
//! Unlike most api clients, non-success statuses are not treated as errors: the status and the raw
//! body are always handed back to the caller, since relays have to pass them on unchanged.

use bytes::Bytes;
use hopwire_bin_common::bin_info;
use reqwest::header;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

pub mod error;

pub use error::HttpClientError;
pub use reqwest::StatusCode;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Builds the url of `endpoint` exposed by the node listening on `address`.
/// Addresses without an explicit `http://` or `https://` scheme (in any case) are assumed
/// to be plain http.
pub fn endpoint_url(address: &str, endpoint: &str) -> Result<Url, HttpClientError> {
    let address = address.trim().trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');

    let has_scheme = ["http://", "https://"].iter().any(|scheme| {
        address
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });
    let raw = if has_scheme {
        format!("{address}/{endpoint}")
    } else {
        format!("http://{address}/{endpoint}")
    };

    Url::parse(&raw).map_err(|source| HttpClientError::MalformedUrl { raw, source })
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpClientError> {
        serde_json::from_slice(&self.body)
            .map_err(|source| HttpClientError::ResponseDecodeFailure { source })
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    inner: reqwest::Client,
    request_timeout: Duration,
}

impl Client {
    pub fn new(request_timeout: Duration) -> Result<Self, HttpClientError> {
        ClientBuilder::new().request_timeout(request_timeout).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Posts `body` as is, tagged as json.
    pub async fn post_bytes(&self, url: Url, body: Vec<u8>) -> Result<RawResponse, HttpClientError> {
        trace!("posting {} bytes to {url}", body.len());

        let response = self
            .inner
            .post(url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .timeout(self.request_timeout)
            .body(body)
            .send()
            .await
            .map_err(|source| HttpClientError::from_send_failure(&url, source))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|source| {
            if source.is_timeout() {
                HttpClientError::Timeout {
                    url: url.to_string(),
                }
            } else {
                HttpClientError::ResponseReadFailure {
                    url: url.to_string(),
                    source,
                }
            }
        })?;

        debug!("{url} responded with {status} ({} bytes)", body.len());
        Ok(RawResponse { status, body })
    }

    pub async fn post_json<T>(&self, url: Url, body: &T) -> Result<RawResponse, HttpClientError>
    where
        T: Serialize + ?Sized,
    {
        let serialised = serde_json::to_vec(body)
            .map_err(|source| HttpClientError::RequestSerialisationFailure { source })?;
        self.post_bytes(url, serialised).await
    }

    /// Posts a json body to `endpoint` of the node listening on `address`.
    pub async fn post_endpoint<T>(
        &self,
        address: &str,
        endpoint: &str,
        body: &T,
    ) -> Result<RawResponse, HttpClientError>
    where
        T: Serialize + ?Sized,
    {
        self.post_json(endpoint_url(address, endpoint)?, body).await
    }
}

pub struct ClientBuilder {
    user_agent: Option<String>,
    request_timeout: Duration,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        ClientBuilder::new()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        ClientBuilder {
            user_agent: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn build(self) -> Result<Client, HttpClientError> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| bin_info!().user_agent());

        Ok(Client {
            inner: reqwest::ClientBuilder::new()
                .user_agent(user_agent)
                .build()
                .map_err(|source| HttpClientError::ClientBuildFailure { source })?,
            request_timeout: self.request_timeout,
        })
    }
}
