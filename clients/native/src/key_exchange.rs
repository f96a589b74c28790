// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

//! Client half of the hybrid RSA/AES handshake establishing a session with a single relay.

use crate::circuit::{decode_through_network, post_via, Hop};
use crate::error::{CircuitError, KeyExchangeError};
use hopwire_crypto::rand::rngs::OsRng;
use hopwire_crypto::SessionKey;
use hopwire_requests::key_exchange::KeyExchangeInitiator;
use hopwire_requests::message_types::GET_AES;
use hopwire_requests::GetAesResponse;
use tracing::{debug, instrument};

pub struct HybridKeyExchange<'a> {
    client: &'a hopwire_http_client::Client,
}

impl<'a> HybridKeyExchange<'a> {
    pub fn new(client: &'a hopwire_http_client::Client) -> Self {
        HybridKeyExchange { client }
    }

    async fn new_initiator() -> Result<KeyExchangeInitiator, KeyExchangeError> {
        // 2048 bit keys take a while to generate, keep it away from the executor threads
        tokio::task::spawn_blocking(|| KeyExchangeInitiator::new(&mut OsRng))
            .await?
            .map_err(|source| KeyExchangeError::KeyGeneration { source })
    }

    /// Establishes a session with the relay at `address` by talking to it directly.
    /// Returns the shared session key alongside the session token.
    pub async fn negotiate(&self, address: &str) -> Result<(SessionKey, String), KeyExchangeError> {
        self.negotiate_through(&[], address).await
    }

    /// Establishes a session with the relay at `address` with the handshake tunnelled through `route`.
    ///
    /// The last hop of a non-empty route must already have `address` registered as its successor.
    /// Only the public key and the encrypted session key travel through the circuit: neither
    /// the relays of the route nor anyone observing them learn the new key.
    #[instrument(skip(self, route), fields(hops = route.len()))]
    pub async fn negotiate_through(
        &self,
        route: &[Hop],
        address: &str,
    ) -> Result<(SessionKey, String), KeyExchangeError> {
        let initiator = Self::new_initiator().await?;
        let request = initiator
            .request()
            .map_err(|source| KeyExchangeError::KeyGeneration { source })?;
        let body = serde_json::to_vec(&request)
            .map_err(|source| CircuitError::RequestSerialisation { source })?;

        let response = post_via(self.client, route, address, GET_AES, body).await?;
        // the new relay has no key to encrypt with yet, so only the route applied its layers
        let payload = decode_through_network(route, &response)?;

        let response: GetAesResponse = serde_json::from_slice(&payload)
            .map_err(|source| KeyExchangeError::MalformedResponse { source })?;
        let established = initiator
            .complete(&response)
            .map_err(|source| KeyExchangeError::KeyRecovery { source })?;

        debug!("established session with {address}");
        Ok(established)
    }
}
