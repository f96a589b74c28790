// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use hopwire_crypto::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestsError {
    #[error("key exchange failure: {source}")]
    KeyExchange {
        #[source]
        source: CryptoError,
    },

    #[error("failed to encrypt {context}: {source}")]
    Encryption {
        context: &'static str,
        #[source]
        source: CryptoError,
    },

    #[error("failed to decrypt {context}: {source}")]
    Decryption {
        context: &'static str,
        #[source]
        source: CryptoError,
    },

    #[error("{context} is not valid base64")]
    MalformedBase64 { context: &'static str },

    #[error("{context} is not valid json: {source}")]
    MalformedJson {
        context: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context} is not valid utf-8")]
    MalformedUtf8 { context: &'static str },

    #[error("'{msg_type}' is not a recognised message type")]
    UnknownMessageType { msg_type: String },

    #[error("layer is addressed to session {received} rather than {expected}")]
    SessionMismatch { expected: String, received: String },

    #[error("attempted to wrap a payload for a circuit without any hops")]
    EmptyCircuit,
}

impl RequestsError {
    pub(crate) fn malformed_json(context: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| RequestsError::MalformedJson { context, source }
    }

    /// Whether the failure was caused by the shape of the data rather than by cryptography.
    pub fn is_encoding_error(&self) -> bool {
        matches!(
            self,
            RequestsError::MalformedBase64 { .. }
                | RequestsError::MalformedJson { .. }
                | RequestsError::MalformedUtf8 { .. }
        )
    }

    pub fn is_decryption_error(&self) -> bool {
        matches!(self, RequestsError::Decryption { .. })
    }
}
