// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::circuit::{decode_through_network, post_via, Circuit, Hop};
use crate::error::{CircuitBuildError, CircuitError};
use crate::key_exchange::HybridKeyExchange;
use hopwire_requests::message_types::SET_REDIRECT;
use hopwire_requests::onion::seal_address;
use hopwire_requests::{SetRedirectRequest, StatusResponse};
use std::iter;
use tracing::{debug, info};

/// Extends a circuit one relay at a time.
///
/// Relay `i` is only contacted once relays `0..i` have both shared a key with us and confirmed
/// their successor: its handshake is tunnelled through them and relay `i - 1` is the one that
/// actually reaches it. Any failure aborts the whole build, nothing is retried.
pub struct CircuitBuilder {
    client: hopwire_http_client::Client,
}

impl CircuitBuilder {
    pub fn new(client: hopwire_http_client::Client) -> Self {
        CircuitBuilder { client }
    }

    pub async fn build<S: AsRef<str>>(
        self,
        hop_addresses: &[S],
        destination: impl Into<String>,
    ) -> Result<Circuit, CircuitBuildError> {
        if hop_addresses.is_empty() {
            return Err(CircuitBuildError::NoHops);
        }
        let destination = destination.into();

        let mut established: Vec<Hop> = Vec::with_capacity(hop_addresses.len());
        for (index, address) in hop_addresses.iter().enumerate() {
            let address = address.as_ref();
            let successor = hop_addresses
                .get(index + 1)
                .map(|next| next.as_ref())
                .unwrap_or(destination.as_str());

            debug!("bootstrapping hop {index} ({address})");
            let (session_key, session_token) = HybridKeyExchange::new(&self.client)
                .negotiate_through(&established, address)
                .await
                .map_err(|source| CircuitBuildError::KeyExchange {
                    index,
                    address: address.to_string(),
                    source,
                })?;

            let mut hop = Hop::new(address, session_key, session_token);
            let status = self
                .register_successor(&established, &hop, successor)
                .await
                .map_err(|source| CircuitBuildError::SetRedirect {
                    index,
                    address: address.to_string(),
                    source,
                })?;
            if !status.is_ok() {
                return Err(CircuitBuildError::UnconfirmedRedirect {
                    index,
                    address: address.to_string(),
                    message: status.message,
                });
            }

            hop.next_hop_address = successor.to_string();
            established.push(hop);
        }

        info!(
            "built a circuit of {} hop(s) towards {destination}",
            established.len()
        );
        Ok(Circuit::new(self.client, established, destination))
    }

    /// Tells `pending` which address to forward its traffic to. The request is tunnelled
    /// through the already established `route`, and the relay answers under its fresh key.
    async fn register_successor(
        &self,
        route: &[Hop],
        pending: &Hop,
        successor: &str,
    ) -> Result<StatusResponse, CircuitError> {
        let request = SetRedirectRequest {
            session: pending.session_token.clone(),
            addr: seal_address(&pending.session_key, successor)?,
        };
        let body = serde_json::to_vec(&request)
            .map_err(|source| CircuitError::RequestSerialisation { source })?;

        let response = post_via(&self.client, route, &pending.address, SET_REDIRECT, body).await?;

        let layers: Vec<&Hop> = route.iter().chain(iter::once(pending)).collect();
        let payload = decode_through_network(&layers, &response)?;
        serde_json::from_slice(&payload).map_err(|source| CircuitError::MalformedResponse { source })
    }
}
