// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::RequestsError;
use crate::message_types::{GET_AES, REDIRECT, SET_REDIRECT};
use crate::models::{GetAesRequest, RedirectPayload, RedirectRequest, SetRedirectRequest};
use hopwire_crypto::encoding::decode_base64;
use serde::de::DeserializeOwned;

/// Decrypted content of a single onion layer, resolved into the request that the relay
/// has to post to its successor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardRequest {
    GetAes(GetAesRequest),
    SetRedirect(SetRedirectRequest),
    Redirect(RedirectRequest),

    /// Opaque payload meant for an endpoint of the final destination.
    Application { endpoint: String, body: Vec<u8> },
}

impl ForwardRequest {
    /// Path (relative to the successor's address) the request has to be posted to.
    pub fn endpoint(&self) -> &str {
        match self {
            ForwardRequest::GetAes(_) => GET_AES,
            ForwardRequest::SetRedirect(_) => SET_REDIRECT,
            ForwardRequest::Redirect(_) => REDIRECT,
            ForwardRequest::Application { endpoint, .. } => endpoint,
        }
    }

    pub fn is_application(&self) -> bool {
        matches!(self, ForwardRequest::Application { .. })
    }

    /// Bytes to put in the body of the forwarded call.
    /// Protocol requests are re-serialised, application payloads are passed through untouched.
    pub fn into_body(self) -> Result<Vec<u8>, RequestsError> {
        let serialised = match self {
            ForwardRequest::GetAes(req) => serde_json::to_vec(&req),
            ForwardRequest::SetRedirect(req) => serde_json::to_vec(&req),
            ForwardRequest::Redirect(req) => serde_json::to_vec(&req),
            ForwardRequest::Application { body, .. } => return Ok(body),
        };
        serialised.map_err(RequestsError::malformed_json("forwarded request"))
    }
}

fn parse_typed<T: DeserializeOwned>(body: &[u8]) -> Result<T, RequestsError> {
    serde_json::from_slice(body).map_err(RequestsError::malformed_json("layer data"))
}

impl TryFrom<RedirectPayload> for ForwardRequest {
    type Error = RequestsError;

    fn try_from(payload: RedirectPayload) -> Result<Self, Self::Error> {
        let body = decode_base64(&payload.data).map_err(|_| RequestsError::MalformedBase64 {
            context: "layer data",
        })?;

        match payload.msg_type.as_str() {
            GET_AES => Ok(ForwardRequest::GetAes(parse_typed(&body)?)),
            SET_REDIRECT => Ok(ForwardRequest::SetRedirect(parse_typed(&body)?)),
            REDIRECT => Ok(ForwardRequest::Redirect(parse_typed(&body)?)),
            endpoint if is_valid_application_endpoint(endpoint) => {
                Ok(ForwardRequest::Application {
                    endpoint: endpoint.to_string(),
                    body,
                })
            }
            _ => Err(RequestsError::UnknownMessageType {
                msg_type: payload.msg_type,
            }),
        }
    }
}

/// Application endpoints are relative paths made of `[A-Za-z0-9._-]` segments separated by `/`.
pub fn is_valid_application_endpoint(endpoint: &str) -> bool {
    if endpoint.is_empty() {
        return false;
    }

    endpoint.split('/').all(|segment| {
        !segment.is_empty()
            && segment != "."
            && segment != ".."
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    })
}
