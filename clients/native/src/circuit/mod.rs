// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::error::CircuitError;
use hopwire_crypto::SessionKey;
use hopwire_http_client::{endpoint_url, RawResponse};
use hopwire_requests::forward::is_valid_application_endpoint;
use hopwire_requests::message_types::REDIRECT;
use hopwire_requests::onion::{peel_response, wrap, OnionHop, PeeledResponse};
use serde::Serialize;
use tracing::{debug, trace};

pub mod builder;

/// A relay of an established circuit.
#[derive(Debug, Clone)]
pub struct Hop {
    pub address: String,
    pub session_token: String,
    pub(crate) session_key: SessionKey,

    /// Empty until the relay confirmed its successor.
    pub next_hop_address: String,
}

impl Hop {
    pub(crate) fn new(address: impl Into<String>, session_key: SessionKey, session_token: String) -> Self {
        Hop {
            address: address.into(),
            session_token,
            session_key,
            next_hop_address: String::new(),
        }
    }
}

impl OnionHop for Hop {
    fn session_token(&self) -> &str {
        &self.session_token
    }

    fn session_key(&self) -> &SessionKey {
        &self.session_key
    }
}

/// Posts `body` meant for the `msg_type` endpoint of `target`.
///
/// With an empty `route` the request goes straight to `target`. Otherwise it gets wrapped for
/// every hop of the route and handed to the entry relay, in which case `target` must already be
/// the recorded successor of the last hop of the route.
pub(crate) async fn post_via(
    client: &hopwire_http_client::Client,
    route: &[Hop],
    target: &str,
    msg_type: &str,
    body: Vec<u8>,
) -> Result<RawResponse, CircuitError> {
    let Some(entry) = route.first() else {
        trace!("sending '{msg_type}' directly to {target}");
        let url = endpoint_url(target, msg_type)?;
        return Ok(client.post_bytes(url, body).await?);
    };

    let envelope = wrap(route, msg_type, &body)?;
    let serialised = serde_json::to_vec(&envelope)
        .map_err(|source| CircuitError::RequestSerialisation { source })?;

    trace!(
        "sending '{msg_type}' to {target} through {} hop(s)",
        route.len()
    );
    let url = endpoint_url(&entry.address, REDIRECT)?;
    Ok(client.post_bytes(url, serialised).await?)
}

/// Removes the response layers applied by `hops`, listed in traversal order, and returns
/// the payload of whoever answered at the far end.
///
/// The response is considered to come from the far end only if every hop applied its layer.
/// A relay that answered on its own (for example because its successor could not be reached),
/// or a non-success status, is surfaced as [`CircuitError::RemoteError`] carrying the
/// peeled error message.
pub fn decode_through_network<H: OnionHop>(
    hops: &[H],
    response: &RawResponse,
) -> Result<Vec<u8>, CircuitError> {
    let peeled = if hops.is_empty() {
        PeeledResponse {
            layers: 0,
            payload: response.body.to_vec(),
        }
    } else {
        match peel_response(hops, &response.body) {
            Ok(peeled) => peeled,
            // e.g. a proxy error page or a rejection issued before any relay logic ran
            Err(err) if !response.is_success() => {
                debug!("could not peel a response with status {}: {err}", response.status);
                return Err(CircuitError::remote(response.status, &response.body));
            }
            Err(err) => return Err(err.into()),
        }
    };

    if !peeled.reached_end(hops.len()) {
        debug!(
            "response got answered after {} out of {} hops",
            peeled.layers,
            hops.len()
        );
        return Err(CircuitError::remote(response.status, &peeled.payload));
    }
    if !response.is_success() {
        return Err(CircuitError::remote(response.status, &peeled.payload));
    }
    Ok(peeled.payload)
}

/// Fully established chain of relays ending at a destination service.
#[derive(Debug)]
pub struct Circuit {
    client: hopwire_http_client::Client,
    hops: Vec<Hop>,
    destination: String,
}

impl Circuit {
    pub(crate) fn new(client: hopwire_http_client::Client, hops: Vec<Hop>, destination: String) -> Self {
        Circuit {
            client,
            hops,
            destination,
        }
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Sends a json request to `endpoint` of the destination and returns its raw response.
    pub async fn send<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        request: &T,
    ) -> Result<Vec<u8>, CircuitError> {
        let body = serde_json::to_vec(request)
            .map_err(|source| CircuitError::RequestSerialisation { source })?;
        self.send_raw(endpoint, body).await
    }

    /// Sends `body`, unmodified, to `endpoint` of the destination and returns its raw response.
    pub async fn send_raw(&self, endpoint: &str, body: Vec<u8>) -> Result<Vec<u8>, CircuitError> {
        if !is_valid_application_endpoint(endpoint) {
            return Err(CircuitError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
            });
        }

        let response = post_via(&self.client, &self.hops, &self.destination, endpoint, body).await?;
        decode_through_network(&self.hops, &response)
    }
}
