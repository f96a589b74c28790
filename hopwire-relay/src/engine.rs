// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

//! Per request logic of a relay.
//!
//! The engine holds no knowledge of circuits beyond what is stored in the sessions:
//! every `redirect` resolves the session, removes exactly one layer and posts whatever it contained
//! to the successor recorded in that session. The successor's response is encrypted under the
//! session key and returned with its original status.

use crate::error::RelayError;
use axum::http::StatusCode;
use hopwire_crypto::rand::rngs::OsRng;
use hopwire_crypto::SessionKey;
use hopwire_http_client::endpoint_url;
use hopwire_requests::key_exchange::accept_key_exchange;
use hopwire_requests::onion::{open_address, open_layer, seal_response};
use hopwire_requests::{
    ErrorResponse, ForwardRequest, GetAesRequest, GetAesResponse, RedirectRequest,
    SetRedirectRequest, StatusResponse,
};
use hopwire_session_store::{SessionRecord, SessionStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Response of the relay, already serialised and, where applicable, encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

fn serialise<T: Serialize>(value: &T) -> Vec<u8> {
    // none of our response types can fail serialisation
    serde_json::to_vec(value).unwrap_or_default()
}

impl RelayResponse {
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        RelayResponse {
            status,
            body: serialise(value),
        }
    }

    /// Error sent back when no session key is available.
    pub fn cleartext_error(err: &RelayError) -> Self {
        RelayResponse::json(err.status_code(), &ErrorResponse::new(err.to_string()))
    }
}

#[derive(Clone)]
pub struct RelayEngine {
    store: Arc<dyn SessionStore>,
    client: hopwire_http_client::Client,
}

impl RelayEngine {
    pub fn new(store: Arc<dyn SessionStore>, client: hopwire_http_client::Client) -> Self {
        RelayEngine { store, client }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    async fn pull_session(&self, token: &str) -> Result<SessionRecord, RelayResponse> {
        self.store.pull(token).await.map_err(|err| {
            let err = RelayError::from(err);
            debug!("rejecting request: {err}");
            RelayResponse::cleartext_error(&err)
        })
    }

    /// Encrypts the outcome of handling a request under the session key.
    fn seal(key: &SessionKey, outcome: Result<(StatusCode, Vec<u8>), RelayError>) -> RelayResponse {
        let (status, plaintext) = match outcome {
            Ok(response) => response,
            Err(err) => {
                warn!("failed to handle the request: {err}");
                (
                    err.status_code(),
                    serialise(&ErrorResponse::new(err.to_string())),
                )
            }
        };

        match seal_response(key, &plaintext) {
            Ok(sealed) => RelayResponse::json(status, &sealed),
            Err(err) => RelayResponse::cleartext_error(&RelayError::from(err)),
        }
    }

    /// Establishes a new session with the holder of the provided RSA key.
    /// The response is always sent in cleartext as no key is shared yet.
    pub async fn get_aes(&self, request: GetAesRequest) -> RelayResponse {
        match self.try_get_aes(request).await {
            Ok(response) => RelayResponse::json(StatusCode::OK, &response),
            Err(err) => {
                debug!("key exchange has failed: {err}");
                RelayResponse::cleartext_error(&err)
            }
        }
    }

    async fn try_get_aes(&self, request: GetAesRequest) -> Result<GetAesResponse, RelayError> {
        let accepted = accept_key_exchange(&mut OsRng, &request)?;
        let token = self
            .store
            .create_session(accepted.session_key.clone())
            .await?;
        debug!("established new session");
        Ok(accepted.response(token))
    }

    /// Records the successor of the session.
    pub async fn set_redirect(&self, request: SetRedirectRequest) -> RelayResponse {
        let record = match self.pull_session(&request.session).await {
            Ok(record) => record,
            Err(response) => return response,
        };

        let outcome = self.try_set_redirect(&record, request).await;
        Self::seal(&record.aes_key, outcome)
    }

    async fn try_set_redirect(
        &self,
        record: &SessionRecord,
        request: SetRedirectRequest,
    ) -> Result<(StatusCode, Vec<u8>), RelayError> {
        let address = open_address(&record.aes_key, &request.addr)?;
        if address.trim().is_empty() || endpoint_url(&address, "").is_err() {
            return Err(RelayError::InvalidRedirectAddress { address });
        }

        trace!("setting redirect address to {address}");
        self.store.update_address(&request.session, address).await?;
        Ok((StatusCode::OK, serialise(&StatusResponse::ok())))
    }

    /// Removes a single layer and forwards its content to the successor.
    pub async fn redirect(&self, request: RedirectRequest) -> RelayResponse {
        let record = match self.pull_session(&request.session).await {
            Ok(record) => record,
            Err(response) => return response,
        };

        let outcome = self.forward(&record, &request.message).await;
        Self::seal(&record.aes_key, outcome)
    }

    async fn forward(
        &self,
        record: &SessionRecord,
        message: &str,
    ) -> Result<(StatusCode, Vec<u8>), RelayError> {
        let payload = open_layer(&record.aes_key, message)?;
        let request = ForwardRequest::try_from(payload)?;

        if !record.has_next_hop() {
            return Err(RelayError::ForwardTargetUnset);
        }

        let url = endpoint_url(&record.next_hop_address, request.endpoint())?;
        trace!("forwarding '{}' request to {url}", request.endpoint());

        let response = self.client.post_bytes(url, request.into_body()?).await?;
        let status =
            StatusCode::from_u16(response.status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        Ok((status, response.body.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopwire_crypto::encoding::{decode_base64, encode_base64};
    use hopwire_requests::key_exchange::KeyExchangeInitiator;
    use hopwire_requests::onion::{open_response, seal_address, wrap, OnionHop};
    use hopwire_requests::EncryptedResponse;
    use hopwire_session_store::InMemorySessionStore;
    use std::time::Duration;

    struct ClientHop {
        token: String,
        key: SessionKey,
    }

    impl OnionHop for ClientHop {
        fn session_token(&self) -> &str {
            &self.token
        }

        fn session_key(&self) -> &SessionKey {
            &self.key
        }
    }

    fn engine_with_ttl(ttl: Duration) -> RelayEngine {
        RelayEngine::new(
            Arc::new(InMemorySessionStore::new(ttl)),
            hopwire_http_client::Client::new(Duration::from_secs(5)).unwrap(),
        )
    }

    fn engine() -> RelayEngine {
        engine_with_ttl(Duration::from_secs(60))
    }

    async fn establish(engine: &RelayEngine) -> ClientHop {
        let initiator = KeyExchangeInitiator::new(&mut OsRng).unwrap();
        let response = engine.get_aes(initiator.request().unwrap()).await;
        assert_eq!(response.status, StatusCode::OK);

        let response: GetAesResponse = serde_json::from_slice(&response.body).unwrap();
        let (key, token) = initiator.complete(&response).unwrap();
        ClientHop { token, key }
    }

    fn decrypt(hop: &ClientHop, response: &RelayResponse) -> Vec<u8> {
        let sealed: EncryptedResponse = serde_json::from_slice(&response.body).unwrap();
        open_response(&hop.key, &sealed).unwrap()
    }

    #[tokio::test]
    async fn key_exchange_creates_a_session() {
        let engine = engine();
        let hop = establish(&engine).await;

        let record = engine.store().pull(&hop.token).await.unwrap();
        assert_eq!(record.aes_key, hop.key);
        assert!(!record.has_next_hop());
    }

    #[tokio::test]
    async fn malformed_public_key_is_rejected_in_cleartext() {
        let engine = engine();
        let response = engine
            .get_aes(GetAesRequest {
                rsa_key: encode_base64(b"garbage"),
            })
            .await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_slice(&response.body).unwrap();
        assert!(error.error.contains("key exchange"));
    }

    #[tokio::test]
    async fn set_redirect_records_the_address() {
        let engine = engine();
        let hop = establish(&engine).await;

        let response = engine
            .set_redirect(SetRedirectRequest {
                session: hop.token.clone(),
                addr: seal_address(&hop.key, "127.0.0.1:4000").unwrap(),
            })
            .await;
        assert_eq!(response.status, StatusCode::OK);

        let status: StatusResponse = serde_json::from_slice(&decrypt(&hop, &response)).unwrap();
        assert!(status.is_ok());

        let record = engine.store().pull(&hop.token).await.unwrap();
        assert_eq!(record.next_hop_address, "127.0.0.1:4000");
    }

    #[tokio::test]
    async fn set_redirect_with_unknown_session_is_unauthorized() {
        let engine = engine();
        let response = engine
            .set_redirect(SetRedirectRequest {
                session: "f".repeat(64),
                addr: "irrelevant".to_string(),
            })
            .await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        let error: ErrorResponse = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(error.error, "session not found");
    }

    #[tokio::test]
    async fn set_redirect_under_wrong_key_is_rejected_with_encrypted_error() {
        let engine = engine();
        let hop = establish(&engine).await;
        let other_key = SessionKey::new(&mut OsRng);

        let response = engine
            .set_redirect(SetRedirectRequest {
                session: hop.token.clone(),
                addr: seal_address(&other_key, "127.0.0.1:4000").unwrap(),
            })
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);

        let error: ErrorResponse = serde_json::from_slice(&decrypt(&hop, &response)).unwrap();
        assert!(error.error.contains("decryption failure"));
        assert!(!engine.store().pull(&hop.token).await.unwrap().has_next_hop());
    }

    #[tokio::test]
    async fn redirect_before_set_redirect_fails() {
        let engine = engine();
        let hop = establish(&engine).await;

        let envelope = wrap(&[&hop], "ping", b"{}").unwrap();
        let response = engine.redirect(envelope).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

        let error: ErrorResponse = serde_json::from_slice(&decrypt(&hop, &response)).unwrap();
        assert_eq!(error.error, "redirect target not configured");
    }

    #[tokio::test]
    async fn unknown_message_types_are_rejected() {
        let engine = engine();
        let hop = establish(&engine).await;

        let envelope = wrap(&[&hop], "../escape", b"{}").unwrap();
        let response = engine.redirect(envelope).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);

        let error: ErrorResponse = serde_json::from_slice(&decrypt(&hop, &response)).unwrap();
        assert!(error.error.contains("unknown message type"));
    }

    #[tokio::test]
    async fn tampered_layers_are_decryption_errors() {
        let engine = engine();
        let hop = establish(&engine).await;

        let mut envelope = wrap(&[&hop], "ping", b"{}").unwrap();
        let mut raw = decode_base64(&envelope.message).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xff;
        envelope.message = encode_base64(raw);

        let response = engine.redirect(envelope).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        let error: ErrorResponse = serde_json::from_slice(&decrypt(&hop, &response)).unwrap();
        assert!(error.error.contains("decryption failure"));
    }

    #[tokio::test]
    async fn expired_sessions_are_not_found_rather_than_undecryptable() {
        let engine = engine_with_ttl(Duration::from_millis(20));
        let hop = establish(&engine).await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let envelope = wrap(&[&hop], "ping", b"{}").unwrap();
        let response = engine.redirect(envelope).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);

        let error: ErrorResponse = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(error.error, "session not found");
    }
}
