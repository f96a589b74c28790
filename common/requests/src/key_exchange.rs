// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Both halves of the hybrid RSA/AES exchange establishing a session with a relay.
//!
//! The client generates an ephemeral RSA keypair and sends its public key, the relay
//! generates a fresh session key and returns it encrypted under that public key.

use crate::error::RequestsError;
use crate::models::{GetAesRequest, GetAesResponse};
use hopwire_crypto::encoding::{decode_base64, encode_base64};
use hopwire_crypto::{EphemeralKeyPair, PublicKey, SessionKey};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

/// Client side of the exchange. It must be consumed by [`KeyExchangeInitiator::complete`]
/// and is never reused across relays.
#[derive(Debug)]
pub struct KeyExchangeInitiator {
    keypair: EphemeralKeyPair,
}

impl KeyExchangeInitiator {
    /// Note: generating a 2048 bit RSA key is slow, so avoid calling this on an async executor.
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, RequestsError> {
        let keypair = EphemeralKeyPair::generate(rng)
            .map_err(|source| RequestsError::KeyExchange { source })?;
        Ok(KeyExchangeInitiator { keypair })
    }

    #[cfg(test)]
    pub(crate) fn from_keypair(keypair: EphemeralKeyPair) -> Self {
        KeyExchangeInitiator { keypair }
    }

    pub fn request(&self) -> Result<GetAesRequest, RequestsError> {
        let rsa_key = self
            .keypair
            .public_key()
            .to_base64_der()
            .map_err(|source| RequestsError::KeyExchange { source })?;
        Ok(GetAesRequest { rsa_key })
    }

    /// Recovers the session key from the relay's response, returning it alongside the session token.
    pub fn complete(self, response: &GetAesResponse) -> Result<(SessionKey, String), RequestsError> {
        let ciphertext =
            decode_base64(&response.aes_key).map_err(|_| RequestsError::MalformedBase64 {
                context: "encrypted session key",
            })?;
        let mut raw = self
            .keypair
            .decrypt(&ciphertext)
            .map_err(|source| RequestsError::KeyExchange { source })?;

        let key = SessionKey::try_from_bytes(&raw);
        raw.zeroize();
        let key = key.map_err(|source| RequestsError::KeyExchange { source })?;

        Ok((key, response.session.clone()))
    }
}

/// Relay side of the exchange: a freshly generated session key together with its
/// encrypted representation to be returned to the client.
#[derive(Debug)]
pub struct AcceptedKeyExchange {
    pub session_key: SessionKey,
    pub encrypted_key: String,
}

impl AcceptedKeyExchange {
    /// Builds the response to return to the client once the session got stored under `session`.
    pub fn response(&self, session: String) -> GetAesResponse {
        GetAesResponse {
            session,
            aes_key: self.encrypted_key.clone(),
        }
    }
}

/// Generates a new session key and encrypts it under the public key contained in the request.
pub fn accept_key_exchange<R: RngCore + CryptoRng>(
    rng: &mut R,
    request: &GetAesRequest,
) -> Result<AcceptedKeyExchange, RequestsError> {
    let public_key = PublicKey::from_base64_der(&request.rsa_key)
        .map_err(|source| RequestsError::KeyExchange { source })?;

    let session_key = SessionKey::new(rng);
    let ciphertext = public_key
        .encrypt(rng, session_key.as_bytes())
        .map_err(|source| RequestsError::KeyExchange { source })?;

    Ok(AcceptedKeyExchange {
        session_key,
        encrypted_key: encode_base64(ciphertext),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopwire_crypto::CryptoError;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn both_sides_agree_on_the_session_key() {
        let mut rng = ChaCha20Rng::from_seed([11u8; 32]);
        let initiator = KeyExchangeInitiator::new(&mut rng).unwrap();
        let request = initiator.request().unwrap();

        let accepted = accept_key_exchange(&mut rng, &request).unwrap();
        let response = accepted.response("a".repeat(64));

        let (client_key, token) = initiator.complete(&response).unwrap();
        assert_eq!(client_key, accepted.session_key);
        assert_eq!(token, "a".repeat(64));
    }

    #[test]
    fn malformed_public_keys_are_rejected() {
        let mut rng = ChaCha20Rng::from_seed([12u8; 32]);
        let request = GetAesRequest {
            rsa_key: encode_base64(b"not a key"),
        };
        let err = accept_key_exchange(&mut rng, &request).unwrap_err();
        assert!(matches!(
            err,
            RequestsError::KeyExchange {
                source: CryptoError::MalformedPublicKey { .. }
            }
        ));
    }

    #[test]
    fn responses_encrypted_for_someone_else_are_rejected() {
        let mut rng = ChaCha20Rng::from_seed([13u8; 32]);
        let initiator = KeyExchangeInitiator::new(&mut rng).unwrap();
        let other = KeyExchangeInitiator::new(&mut rng).unwrap();

        let accepted = accept_key_exchange(&mut rng, &other.request().unwrap()).unwrap();
        let response = accepted.response("token".to_string());

        assert!(matches!(
            initiator.complete(&response),
            Err(RequestsError::KeyExchange { .. })
        ));
    }

    #[test]
    fn session_keys_of_invalid_length_are_rejected() {
        let mut rng = ChaCha20Rng::from_seed([14u8; 32]);
        let keypair = EphemeralKeyPair::generate(&mut rng).unwrap();
        let ciphertext = keypair.public_key().encrypt(&mut rng, &[1u8; 20]).unwrap();
        let initiator = KeyExchangeInitiator::from_keypair(keypair);

        let response = GetAesResponse {
            session: "token".to_string(),
            aes_key: encode_base64(ciphertext),
        };
        assert!(matches!(
            initiator.complete(&response),
            Err(RequestsError::KeyExchange {
                source: CryptoError::InvalidKeyLength { received: 20 }
            })
        ));
    }
}
