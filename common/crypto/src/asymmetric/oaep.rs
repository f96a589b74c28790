// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Ephemeral RSA keys used exclusively for transporting a freshly generated session key
//! from a relay back to the client that asked for it.

use crate::encoding::{decode_base64, encode_base64};
use crate::error::CryptoError;
use rand::{CryptoRng, RngCore};
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use std::fmt::{self, Debug, Formatter};

/// Modulus size of every ephemeral keypair generated by clients.
pub const RSA_KEY_BITS: usize = 2048;

fn oaep_padding() -> Oaep {
    Oaep::new::<Sha256>()
}

/// Single-use keypair generated by the client for one key exchange.
/// It is dropped as soon as the relay's session key has been recovered.
pub struct EphemeralKeyPair {
    private_key: RsaPrivateKey,
    public_key: PublicKey,
}

impl Debug for EphemeralKeyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralKeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl EphemeralKeyPair {
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, CryptoError> {
        Self::generate_with_size(rng, RSA_KEY_BITS)
    }

    pub(crate) fn generate_with_size<R: RngCore + CryptoRng>(
        rng: &mut R,
        bits: usize,
    ) -> Result<Self, CryptoError> {
        let private_key = RsaPrivateKey::new(rng, bits)?;
        let public_key = PublicKey(RsaPublicKey::from(&private_key));
        Ok(EphemeralKeyPair {
            private_key,
            public_key,
        })
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(self.private_key.decrypt(oaep_padding(), ciphertext)?)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

impl Debug for PublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.to_base64_der() {
            Ok(encoded) => write!(f, "PublicKey({encoded})"),
            Err(_) => write!(f, "PublicKey(<unencodable>)"),
        }
    }
}

impl PublicKey {
    /// Encodes the key as base64 of its DER `SubjectPublicKeyInfo` representation.
    pub fn to_base64_der(&self) -> Result<String, CryptoError> {
        let document =
            self.0
                .to_public_key_der()
                .map_err(|err| CryptoError::MalformedPublicKey {
                    message: err.to_string(),
                })?;
        Ok(encode_base64(document.as_bytes()))
    }

    pub fn from_base64_der(encoded: &str) -> Result<Self, CryptoError> {
        let der = decode_base64(encoded)?;
        let key =
            RsaPublicKey::from_public_key_der(&der).map_err(|err| CryptoError::MalformedPublicKey {
                message: err.to_string(),
            })?;
        Ok(PublicKey(key))
    }

    pub fn encrypt<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        Ok(self.0.encrypt(rng, oaep_padding(), plaintext)?)
    }
}
