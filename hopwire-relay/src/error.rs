// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use hopwire_http_client::HttpClientError;
use hopwire_requests::RequestsError;
use hopwire_session_store::SessionStoreError;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of handling a single request. Every variant ends up being sent back to the caller,
/// encrypted whenever the session has been resolved.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("session not found")]
    SessionNotFound,

    #[error("key exchange failure: {source}")]
    KeyExchange {
        #[source]
        source: RequestsError,
    },

    #[error("malformed request: {message}")]
    Encoding { message: String },

    #[error("request body exceeds the limit of {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("failed to read the request body: {message}")]
    UnreadableBody { message: String },

    #[error("decryption failure: {source}")]
    Decryption {
        #[source]
        source: RequestsError,
    },

    #[error("unknown message type '{msg_type}'")]
    UnknownMessageType { msg_type: String },

    #[error("'{address}' is not a valid redirect address")]
    InvalidRedirectAddress { address: String },

    #[error("redirect target not configured")]
    ForwardTargetUnset,

    #[error("failed to forward the request: {source}")]
    ForwardFailure {
        #[source]
        source: HttpClientError,
    },

    #[error("internal relay failure: {message}")]
    Internal { message: String },
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::SessionNotFound => StatusCode::UNAUTHORIZED,
            RelayError::KeyExchange { .. }
            | RelayError::Encoding { .. }
            | RelayError::UnreadableBody { .. }
            | RelayError::Decryption { .. }
            | RelayError::UnknownMessageType { .. }
            | RelayError::InvalidRedirectAddress { .. } => StatusCode::BAD_REQUEST,
            RelayError::ForwardTargetUnset | RelayError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            RelayError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::ForwardFailure { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub(crate) fn malformed_body(source: serde_json::Error) -> Self {
        RelayError::Encoding {
            message: source.to_string(),
        }
    }

    pub(crate) fn rejected_body(rejection: BytesRejection, limit: usize) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            RelayError::BodyTooLarge { limit }
        } else {
            RelayError::UnreadableBody {
                message: rejection.body_text(),
            }
        }
    }
}

impl From<SessionStoreError> for RelayError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::SessionNotFound => RelayError::SessionNotFound,
        }
    }
}

impl From<HttpClientError> for RelayError {
    fn from(source: HttpClientError) -> Self {
        RelayError::ForwardFailure { source }
    }
}

impl From<RequestsError> for RelayError {
    fn from(source: RequestsError) -> Self {
        match source {
            RequestsError::KeyExchange { .. } => RelayError::KeyExchange { source },
            RequestsError::Decryption { .. } => RelayError::Decryption { source },
            RequestsError::UnknownMessageType { msg_type } => {
                RelayError::UnknownMessageType { msg_type }
            }
            RequestsError::MalformedBase64 { .. }
            | RequestsError::MalformedJson { .. }
            | RequestsError::MalformedUtf8 { .. } => RelayError::Encoding {
                message: source.to_string(),
            },
            RequestsError::Encryption { .. }
            | RequestsError::SessionMismatch { .. }
            | RequestsError::EmptyCircuit => RelayError::Internal {
                message: source.to_string(),
            },
        }
    }
}

/// Failures of the relay process itself, as opposed to failures of individual requests.
#[derive(Debug, Error)]
pub enum RelayNodeError {
    #[error("failed to load config file using path '{}'. detailed message: {source}", path.display())]
    ConfigLoadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file at '{}': {source}", path.display())]
    ConfigParseFailure {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to save config file using path '{}'. detailed message: {source}", path.display())]
    ConfigSaveFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialise the config: {source}")]
    ConfigSerialisationFailure {
        #[from]
        source: toml::ser::Error,
    },

    #[error("the provided configuration is invalid: {message}")]
    InvalidConfig { message: String },

    #[error("failed to bind the HTTP API to {bind_address}: {source}")]
    HttpBindFailure {
        bind_address: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("the HTTP server has failed: {source}")]
    HttpServerFailure {
        #[source]
        source: io::Error,
    },

    #[error("failed to build the forwarding client: {source}")]
    ForwardingClientFailure {
        #[from]
        source: HttpClientError,
    },
}
