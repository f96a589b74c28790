// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use hopwire_http_client::{HttpClientError, DEFAULT_REQUEST_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, PartialEq, Serialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Maximum duration of every call made to the entry relay, including the time the relays
    /// need to pass the request along the circuit and bring the response back.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn build_http_client(&self) -> Result<hopwire_http_client::Client, HttpClientError> {
        hopwire_http_client::Client::new(self.request_timeout)
    }
}
