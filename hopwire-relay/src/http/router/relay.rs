// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::engine::RelayResponse;
use crate::error::RelayError;
use crate::http::state::AppState;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use hopwire_requests::{GetAesRequest, RedirectRequest, SetRedirectRequest};
use serde::de::DeserializeOwned;
use tracing::debug;

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

// bodies are parsed by hand rather than through `Json` so that rejections follow our error format
fn parse_body<T: DeserializeOwned>(
    state: &AppState,
    body: Result<Bytes, BytesRejection>,
) -> Result<T, RelayResponse> {
    let reject = |err: RelayError| {
        debug!("rejecting request: {err}");
        RelayResponse::cleartext_error(&err)
    };

    let body = body.map_err(|rejection| {
        reject(RelayError::rejected_body(rejection, state.max_request_body))
    })?;
    serde_json::from_slice(&body).map_err(|source| reject(RelayError::malformed_body(source)))
}

pub(crate) async fn get_aes(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> RelayResponse {
    match parse_body::<GetAesRequest>(&state, body) {
        Ok(request) => state.engine.get_aes(request).await,
        Err(response) => response,
    }
}

pub(crate) async fn set_redirect(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> RelayResponse {
    match parse_body::<SetRedirectRequest>(&state, body) {
        Ok(request) => state.engine.set_redirect(request).await,
        Err(response) => response,
    }
}

pub(crate) async fn redirect(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> RelayResponse {
    match parse_body::<RedirectRequest>(&state, body) {
        Ok(request) => state.engine.redirect(request).await,
        Err(response) => response,
    }
}
