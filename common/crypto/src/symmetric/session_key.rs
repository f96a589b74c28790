// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::CryptoError;
use aes::Aes192;
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, Nonce};
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::fmt::{self, Debug, Formatter};
use zeroize::{Zeroize, ZeroizeOnDrop};

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Length of the random nonce prepended to every ciphertext.
pub const NONCE_SIZE: usize = 12;

/// Length of the GCM authentication tag appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

/// Symmetric key shared between a client and a single relay for the lifetime of a session.
///
/// Every encryption draws a fresh random nonce which is prepended to the produced ciphertext,
/// i.e. the output has the form of `NONCE || CIPHERTEXT || TAG`.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SessionKey {
    bytes: Vec<u8>,
}

impl Debug for SessionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKey")
            .field("length", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

impl SessionKey {
    /// Length of the keys generated by relays, i.e. AES-256.
    pub const GENERATED_KEY_LENGTH: usize = 32;

    pub fn new<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut bytes = vec![0u8; Self::GENERATED_KEY_LENGTH];
        rng.fill_bytes(&mut bytes);
        SessionKey { bytes }
    }

    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            16 | 24 | 32 => Ok(SessionKey {
                bytes: bytes.to_vec(),
            }),
            received => Err(CryptoError::InvalidKeyLength { received }),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.encrypt_with_rng(&mut OsRng, plaintext)
    }

    pub fn encrypt_with_rng<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let mut nonce = [0u8; NONCE_SIZE];
        rng.fill_bytes(&mut nonce);

        let ciphertext = match self.bytes.len() {
            16 => seal::<Aes128Gcm>(&self.bytes, &nonce, plaintext),
            24 => seal::<Aes192Gcm>(&self.bytes, &nonce, plaintext),
            32 => seal::<Aes256Gcm>(&self.bytes, &nonce, plaintext),
            received => Err(CryptoError::InvalidKeyLength { received }),
        }?;

        let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let minimum = NONCE_SIZE + TAG_SIZE;
        if ciphertext.len() < minimum {
            return Err(CryptoError::CiphertextTooShort {
                received: ciphertext.len(),
                minimum,
            });
        }
        let (nonce, ciphertext) = ciphertext.split_at(NONCE_SIZE);

        match self.bytes.len() {
            16 => open::<Aes128Gcm>(&self.bytes, nonce, ciphertext),
            24 => open::<Aes192Gcm>(&self.bytes, nonce, ciphertext),
            32 => open::<Aes256Gcm>(&self.bytes, nonce, ciphertext),
            received => Err(CryptoError::InvalidKeyLength { received }),
        }
    }
}

fn seal<C>(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key)
        .map_err(|_| CryptoError::InvalidKeyLength { received: key.len() })?;
    cipher
        .encrypt(Nonce::<C>::from_slice(nonce), plaintext)
        .map_err(|_| CryptoError::EncryptionFailure)
}

fn open<C>(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key)
        .map_err(|_| CryptoError::InvalidKeyLength { received: key.len() })?;
    cipher
        .decrypt(Nonce::<C>::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::DecryptionFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn test_rng() -> ChaCha20Rng {
        ChaCha20Rng::from_seed([42u8; 32])
    }

    #[test]
    fn generated_keys_are_aes256() {
        let key = SessionKey::new(&mut test_rng());
        assert_eq!(key.as_bytes().len(), 32);
    }

    #[test]
    fn all_aes_key_sizes_decrypt_their_own_output() {
        let mut rng = test_rng();
        for len in [16, 24, 32] {
            let mut raw = vec![0u8; len];
            rng.fill_bytes(&mut raw);
            let key = SessionKey::try_from_bytes(&raw).unwrap();

            let ciphertext = key.encrypt(b"layer payload").unwrap();
            assert_eq!(ciphertext.len(), NONCE_SIZE + b"layer payload".len() + TAG_SIZE);
            assert_eq!(key.decrypt(&ciphertext).unwrap(), b"layer payload");
        }
    }

    #[test]
    fn rejects_invalid_key_lengths() {
        for len in [0, 15, 17, 31, 33, 128] {
            let err = SessionKey::try_from_bytes(&vec![1u8; len]).unwrap_err();
            assert!(matches!(err, CryptoError::InvalidKeyLength { received } if received == len));
        }
    }

    #[test]
    fn every_encryption_uses_fresh_nonce() {
        let key = SessionKey::new(&mut test_rng());
        let first = key.encrypt(b"same").unwrap();
        let second = key.encrypt(b"same").unwrap();
        assert_ne!(first[..NONCE_SIZE], second[..NONCE_SIZE]);
        assert_ne!(first, second);
    }

    #[test]
    fn flipping_any_bit_fails_authentication() {
        let key = SessionKey::new(&mut test_rng());
        let ciphertext = key.encrypt(b"do not touch").unwrap();

        for byte in 0..ciphertext.len() {
            for bit in 0..8 {
                let mut tampered = ciphertext.clone();
                tampered[byte] ^= 1 << bit;
                assert!(matches!(
                    key.decrypt(&tampered),
                    Err(CryptoError::DecryptionFailure)
                ));
            }
        }
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let mut rng = test_rng();
        let key = SessionKey::new(&mut rng);
        let other = SessionKey::new(&mut rng);
        let ciphertext = key.encrypt(b"for key one").unwrap();
        assert!(matches!(
            other.decrypt(&ciphertext),
            Err(CryptoError::DecryptionFailure)
        ));
    }

    #[test]
    fn truncated_ciphertext_is_rejected() {
        let key = SessionKey::new(&mut test_rng());
        let err = key.decrypt(&[0u8; NONCE_SIZE + TAG_SIZE - 1]).unwrap_err();
        assert!(matches!(err, CryptoError::CiphertextTooShort { .. }));
    }

    #[test]
    fn debug_output_does_not_leak_key_material() {
        let key = SessionKey::try_from_bytes(&[0xAB; 16]).unwrap();
        let formatted = format!("{key:?}");
        assert!(!formatted.contains("171"));
        assert!(!formatted.to_lowercase().contains("ab, "));
    }
}
