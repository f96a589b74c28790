// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Layered encryption of requests travelling through a circuit and of the responses
//! travelling back.
//!
//! A single layer, as sent to a relay, has the form of
//! `RedirectRequest { Session, Message: base64(AES(base64(json(RedirectPayload)))) }`
//! where `RedirectPayload::data` is the base64 encoded body the relay has to forward.
//! When wrapping for `N` hops, the body of every layer but the innermost one is the serialised
//! `RedirectRequest` for the following hop.

use crate::error::RequestsError;
use crate::forward::ForwardRequest;
use crate::message_types::REDIRECT;
use crate::models::{EncryptedResponse, RedirectPayload, RedirectRequest};
use hopwire_crypto::encoding::{decode_base64, encode_base64};
use hopwire_crypto::SessionKey;
use tracing::trace;

/// Anything holding an established session with a relay.
pub trait OnionHop {
    fn session_token(&self) -> &str;

    fn session_key(&self) -> &SessionKey;
}

impl<T: OnionHop + ?Sized> OnionHop for &T {
    fn session_token(&self) -> &str {
        (**self).session_token()
    }

    fn session_key(&self) -> &SessionKey {
        (**self).session_key()
    }
}

/// `base64(AES(base64(plaintext)))`, the encoding shared by `Message` and `Addr`.
fn seal_encoded(
    key: &SessionKey,
    plaintext: &[u8],
    context: &'static str,
) -> Result<String, RequestsError> {
    let inner = encode_base64(plaintext);
    let ciphertext = key
        .encrypt(inner.as_bytes())
        .map_err(|source| RequestsError::Encryption { context, source })?;
    Ok(encode_base64(ciphertext))
}

fn open_encoded(
    key: &SessionKey,
    sealed: &str,
    context: &'static str,
) -> Result<Vec<u8>, RequestsError> {
    let ciphertext =
        decode_base64(sealed).map_err(|_| RequestsError::MalformedBase64 { context })?;
    let inner = key
        .decrypt(&ciphertext)
        .map_err(|source| RequestsError::Decryption { context, source })?;
    decode_base64(&inner).map_err(|_| RequestsError::MalformedBase64 { context })
}

/// Encrypts a single layer containing `body` that the hop has to post to `msg_type`
/// of its successor.
pub fn seal_payload<H: OnionHop>(
    hop: &H,
    msg_type: &str,
    body: &[u8],
) -> Result<RedirectRequest, RequestsError> {
    let payload = RedirectPayload {
        msg_type: msg_type.to_string(),
        data: encode_base64(body),
    };
    let serialised =
        serde_json::to_vec(&payload).map_err(RequestsError::malformed_json("layer payload"))?;

    Ok(RedirectRequest {
        session: hop.session_token().to_string(),
        message: seal_encoded(hop.session_key(), &serialised, "layer payload")?,
    })
}

/// Decrypts the single layer of `message` addressed to the holder of `key`.
pub fn open_layer(key: &SessionKey, message: &str) -> Result<RedirectPayload, RequestsError> {
    let serialised = open_encoded(key, message, "layer payload")?;
    serde_json::from_slice(&serialised).map_err(RequestsError::malformed_json("layer payload"))
}

/// Wraps `body`, destined for the `msg_type` endpoint of whatever follows the last hop,
/// in one layer per hop. The returned envelope is meant for the first hop's `/redirect`.
pub fn wrap<H: OnionHop>(
    hops: &[H],
    msg_type: &str,
    body: &[u8],
) -> Result<RedirectRequest, RequestsError> {
    let Some((last, outer)) = hops.split_last() else {
        return Err(RequestsError::EmptyCircuit);
    };

    let mut envelope = seal_payload(last, msg_type, body)?;
    for hop in outer.iter().rev() {
        let serialised = serde_json::to_vec(&envelope)
            .map_err(RequestsError::malformed_json("redirect envelope"))?;
        envelope = seal_payload(hop, REDIRECT, &serialised)?;
    }

    trace!("wrapped '{msg_type}' request in {} layers", hops.len());
    Ok(envelope)
}

/// Convenience wrapper around [`wrap`] for json serialisable requests.
pub fn wrap_request<H, T>(hops: &[H], msg_type: &str, request: &T) -> Result<RedirectRequest, RequestsError>
where
    H: OnionHop,
    T: serde::Serialize,
{
    let body =
        serde_json::to_vec(request).map_err(RequestsError::malformed_json("wrapped request"))?;
    wrap(hops, msg_type, &body)
}

/// Mirrors what the chain of relays does with an envelope produced by [`wrap`]:
/// removes one layer per hop and returns the innermost `(msg_type, body)`.
pub fn unwrap<H: OnionHop>(
    hops: &[H],
    envelope: &RedirectRequest,
) -> Result<(String, Vec<u8>), RequestsError> {
    if hops.is_empty() {
        return Err(RequestsError::EmptyCircuit);
    }

    let mut current = envelope.clone();
    for (i, hop) in hops.iter().enumerate() {
        if current.session != hop.session_token() {
            return Err(RequestsError::SessionMismatch {
                expected: hop.session_token().to_string(),
                received: current.session,
            });
        }

        let payload = open_layer(hop.session_key(), &current.message)?;
        let request = ForwardRequest::try_from(payload)?;
        if i + 1 == hops.len() {
            let msg_type = request.endpoint().to_string();
            return Ok((msg_type, request.into_body()?));
        }
        match request {
            ForwardRequest::Redirect(next) => current = next,
            other => {
                return Err(RequestsError::UnknownMessageType {
                    msg_type: other.endpoint().to_string(),
                })
            }
        }
    }

    Err(RequestsError::EmptyCircuit)
}

/// Encrypts the `Addr` field of a `set-redirect` request.
pub fn seal_address(key: &SessionKey, address: &str) -> Result<String, RequestsError> {
    seal_encoded(key, address.as_bytes(), "redirect address")
}

pub fn open_address(key: &SessionKey, sealed: &str) -> Result<String, RequestsError> {
    let raw = open_encoded(key, sealed, "redirect address")?;
    String::from_utf8(raw).map_err(|_| RequestsError::MalformedUtf8 {
        context: "redirect address",
    })
}

pub fn seal_response(key: &SessionKey, response: &[u8]) -> Result<EncryptedResponse, RequestsError> {
    let ciphertext = key
        .encrypt(response)
        .map_err(|source| RequestsError::Encryption {
            context: "response",
            source,
        })?;
    Ok(EncryptedResponse {
        data: encode_base64(ciphertext),
    })
}

pub fn open_response(key: &SessionKey, response: &EncryptedResponse) -> Result<Vec<u8>, RequestsError> {
    let ciphertext = decode_base64(&response.data).map_err(|_| RequestsError::MalformedBase64 {
        context: "response",
    })?;
    key.decrypt(&ciphertext)
        .map_err(|source| RequestsError::Decryption {
            context: "response",
            source,
        })
}

/// Result of peeling a response returned by the first hop of a circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeeledResponse {
    /// Number of layers that have been removed.
    pub layers: usize,

    pub payload: Vec<u8>,
}

impl PeeledResponse {
    /// Whether the payload came from the far end of the circuit rather than from
    /// a relay that failed to forward it.
    pub fn reached_end(&self, hops: usize) -> bool {
        self.layers == hops
    }
}

/// Decrypts `body` with the key of each hop in traversal order.
///
/// Peeling stops early as soon as a decrypted layer is not a further `{Data}` envelope
/// (or its `Data` is empty). This happens when an intermediate relay answered on its own,
/// for example with an error, rather than relaying its successor's response.
/// The payload of the last hop is always treated as final.
pub fn peel_response<H: OnionHop>(hops: &[H], body: &[u8]) -> Result<PeeledResponse, RequestsError> {
    let Some((first, rest)) = hops.split_first() else {
        return Err(RequestsError::EmptyCircuit);
    };

    let mut current: EncryptedResponse =
        serde_json::from_slice(body).map_err(RequestsError::malformed_json("response"))?;
    if current.data.is_empty() {
        // the first hop did not apply any layer at all
        return Ok(PeeledResponse {
            layers: 0,
            payload: body.to_vec(),
        });
    }

    let mut payload = open_response(first.session_key(), &current)?;
    let mut layers = 1;
    for hop in rest {
        match serde_json::from_slice::<EncryptedResponse>(&payload) {
            Ok(next) if !next.data.is_empty() => current = next,
            _ => break,
        }
        payload = open_response(hop.session_key(), &current)?;
        layers += 1;
    }

    trace!("peeled {layers} response layers");
    Ok(PeeledResponse { layers, payload })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ErrorResponse, GetAesRequest};
    use hopwire_crypto::rand::{CryptoRng, RngCore};
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    struct TestHop {
        token: String,
        key: SessionKey,
    }

    impl OnionHop for TestHop {
        fn session_token(&self) -> &str {
            &self.token
        }

        fn session_key(&self) -> &SessionKey {
            &self.key
        }
    }

    fn test_hops<R: RngCore + CryptoRng>(rng: &mut R, n: usize) -> Vec<TestHop> {
        (0..n)
            .map(|i| TestHop {
                token: format!("token-{i}"),
                key: SessionKey::new(rng),
            })
            .collect()
    }

    #[test]
    fn wrapping_and_unwrapping_recovers_original_payload() {
        let mut rng = ChaCha20Rng::from_seed([1u8; 32]);
        for n in 1..=5 {
            let hops = test_hops(&mut rng, n);
            let envelope = wrap(&hops, "ping", b"hello from the client").unwrap();
            assert_eq!(envelope.session, "token-0");

            let (msg_type, body) = unwrap(&hops, &envelope).unwrap();
            assert_eq!(msg_type, "ping");
            assert_eq!(body, b"hello from the client");
        }
    }

    #[test]
    fn wrapping_produces_one_layer_per_hop() {
        let mut rng = ChaCha20Rng::from_seed([2u8; 32]);
        let hops = test_hops(&mut rng, 3);
        let envelope = wrap_request(
            &hops,
            "get-aes",
            &GetAesRequest {
                rsa_key: "a2V5".to_string(),
            },
        )
        .unwrap();

        let mut decryptions = 0;
        let mut current = envelope;
        loop {
            let hop = &hops[decryptions];
            assert_eq!(current.session, hop.token);
            let payload = open_layer(&hop.key, &current.message).unwrap();
            decryptions += 1;

            match ForwardRequest::try_from(payload).unwrap() {
                ForwardRequest::Redirect(next) => current = next,
                ForwardRequest::GetAes(req) => {
                    assert_eq!(req.rsa_key, "a2V5");
                    break;
                }
                other => panic!("unexpected layer content: {other:?}"),
            }
        }
        assert_eq!(decryptions, 3);
    }

    #[test]
    fn a_layer_cannot_be_opened_by_other_hops() {
        let mut rng = ChaCha20Rng::from_seed([3u8; 32]);
        let hops = test_hops(&mut rng, 2);
        let envelope = wrap(&hops, "ping", b"").unwrap();

        let err = open_layer(&hops[1].key, &envelope.message).unwrap_err();
        assert!(err.is_decryption_error());
    }

    #[test]
    fn tampered_layers_are_rejected() {
        let mut rng = ChaCha20Rng::from_seed([4u8; 32]);
        let hops = test_hops(&mut rng, 1);
        let envelope = wrap(&hops, "ping", b"payload").unwrap();

        let mut raw = decode_base64(&envelope.message).unwrap();
        raw[0] ^= 0x01;
        let err = open_layer(&hops[0].key, &encode_base64(&raw)).unwrap_err();
        assert!(err.is_decryption_error());

        let err = open_layer(&hops[0].key, "this is not base64").unwrap_err();
        assert!(err.is_encoding_error());
    }

    #[test]
    fn wrapping_for_empty_circuit_fails() {
        let hops: Vec<TestHop> = Vec::new();
        assert!(matches!(
            wrap(&hops, "ping", b""),
            Err(RequestsError::EmptyCircuit)
        ));
        assert!(matches!(
            peel_response(&hops, b"{}"),
            Err(RequestsError::EmptyCircuit)
        ));
    }

    #[test]
    fn addresses_are_double_encoded() {
        let mut rng = ChaCha20Rng::from_seed([5u8; 32]);
        let key = SessionKey::new(&mut rng);
        let sealed = seal_address(&key, "127.0.0.1:8080").unwrap();

        let inner = key.decrypt(&decode_base64(&sealed).unwrap()).unwrap();
        assert_eq!(inner, encode_base64("127.0.0.1:8080").as_bytes());
        assert_eq!(open_address(&key, &sealed).unwrap(), "127.0.0.1:8080");
    }

    // emulates what every relay does with the response of its successor
    fn respond_through<H: OnionHop>(hops: &[H], final_response: &[u8]) -> Vec<u8> {
        let mut response = final_response.to_vec();
        for hop in hops.iter().rev() {
            let sealed = seal_response(hop.session_key(), &response).unwrap();
            response = serde_json::to_vec(&sealed).unwrap();
        }
        response
    }

    #[test]
    fn peeling_recovers_the_final_response() {
        let mut rng = ChaCha20Rng::from_seed([6u8; 32]);
        let hops = test_hops(&mut rng, 3);

        // even a response that looks like another layer must be returned as is
        let final_response = br#"{"Data":"not for us"}"#;
        let body = respond_through(&hops, final_response);

        let peeled = peel_response(&hops, &body).unwrap();
        assert_eq!(peeled.layers, 3);
        assert!(peeled.reached_end(3));
        assert_eq!(peeled.payload, final_response);
    }

    #[test]
    fn peeling_stops_at_the_relay_that_answered() {
        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        let hops = test_hops(&mut rng, 3);

        let error = serde_json::to_vec(&ErrorResponse::new("session not found")).unwrap();
        let body = respond_through(&hops[..2], &error);

        let peeled = peel_response(&hops, &body).unwrap();
        assert_eq!(peeled.layers, 2);
        assert!(!peeled.reached_end(3));
        let decoded: ErrorResponse = serde_json::from_slice(&peeled.payload).unwrap();
        assert_eq!(decoded.error, "session not found");
    }

    #[test]
    fn layers_with_empty_data_are_terminal() {
        let mut rng = ChaCha20Rng::from_seed([9u8; 32]);
        let hops = test_hops(&mut rng, 3);

        let answer = br#"{"Data":""}"#;
        let body = respond_through(&hops[..2], answer);

        let peeled = peel_response(&hops, &body).unwrap();
        assert_eq!(peeled.layers, 2);
        assert!(!peeled.reached_end(3));
        assert_eq!(peeled.payload, answer);
    }

    #[test]
    fn cleartext_responses_of_the_first_hop_are_returned_as_is() {
        let mut rng = ChaCha20Rng::from_seed([8u8; 32]);
        let hops = test_hops(&mut rng, 2);

        let error = serde_json::to_vec(&ErrorResponse::new("unknown session")).unwrap();
        let peeled = peel_response(&hops, &error).unwrap();
        assert_eq!(peeled.layers, 0);
        assert_eq!(peeled.payload, error);
    }
}
