// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HttpClientError {
    #[error("provided address ({raw}) can't be turned into a valid url: {source}")]
    MalformedUrl {
        raw: String,
        source: url::ParseError,
    },

    #[error("failed to build internal client: {source}")]
    ClientBuildFailure { source: reqwest::Error },

    #[error("request to {url} has timed out")]
    Timeout { url: String },

    #[error("failed to send request to {url}: {source}")]
    RequestSendingFailure { url: String, source: reqwest::Error },

    #[error("failed to read response from {url}: {source}")]
    ResponseReadFailure { url: String, source: reqwest::Error },

    #[error("failed to serialise request body: {source}")]
    RequestSerialisationFailure { source: serde_json::Error },

    #[error("failed to decode received response: {source}")]
    ResponseDecodeFailure { source: serde_json::Error },
}

impl HttpClientError {
    pub(crate) fn from_send_failure(url: &url::Url, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            HttpClientError::Timeout {
                url: url.to_string(),
            }
        } else {
            HttpClientError::RequestSendingFailure {
                url: url.to_string(),
                source,
            }
        }
    }
}
