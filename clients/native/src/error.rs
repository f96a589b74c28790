// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use hopwire_http_client::{HttpClientError, StatusCode};
use hopwire_requests::{ErrorResponse, RequestsError};
use thiserror::Error;
use tokio::task::JoinError;

/// Failure of a single exchange with the circuit, or with a relay directly.
#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("transport failure: {source}")]
    Transport {
        #[from]
        source: HttpClientError,
    },

    #[error("failed to encode or decode the onion layers: {source}")]
    Codec {
        #[from]
        source: RequestsError,
    },

    #[error("remote failure ({status}): {message}")]
    RemoteError { status: StatusCode, message: String },

    #[error("'{endpoint}' is not a valid destination endpoint")]
    InvalidEndpoint { endpoint: String },

    #[error("failed to serialise the request: {source}")]
    RequestSerialisation {
        #[source]
        source: serde_json::Error,
    },

    #[error("received a response of unexpected shape: {source}")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
    },
}

impl CircuitError {
    /// Recovers the error reported by whoever answered the request.
    /// Bodies that are not a structured error are reported verbatim.
    pub(crate) fn remote(status: StatusCode, body: &[u8]) -> Self {
        let message = match serde_json::from_slice::<ErrorResponse>(body) {
            Ok(response) => response.error,
            Err(_) => String::from_utf8_lossy(body).into_owned(),
        };
        CircuitError::RemoteError { status, message }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, CircuitError::RemoteError { .. })
    }
}

#[derive(Debug, Error)]
pub enum KeyExchangeError {
    #[error("failed to generate the ephemeral keypair: {source}")]
    KeyGeneration {
        #[source]
        source: RequestsError,
    },

    #[error("the keypair generation task has failed: {source}")]
    KeyGenerationTaskFailure {
        #[from]
        source: JoinError,
    },

    #[error("failed to exchange keys with the relay: {source}")]
    Exchange {
        #[from]
        source: CircuitError,
    },

    #[error("the relay responded with a malformed key exchange response: {source}")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to recover the session key: {source}")]
    KeyRecovery {
        #[source]
        source: RequestsError,
    },
}

#[derive(Debug, Error)]
pub enum CircuitBuildError {
    #[error("can't build a circuit without any hops")]
    NoHops,

    #[error("failed to establish a session with hop {index} ({address}): {source}")]
    KeyExchange {
        index: usize,
        address: String,
        #[source]
        source: KeyExchangeError,
    },

    #[error("failed to register the successor of hop {index} ({address}): {source}")]
    SetRedirect {
        index: usize,
        address: String,
        #[source]
        source: CircuitError,
    },

    #[error("hop {index} ({address}) has not confirmed its successor. it responded with '{message}'")]
    UnconfirmedRedirect {
        index: usize,
        address: String,
        message: String,
    },
}
