// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("the provided aes key has invalid length. Got: {received}, but expected one of 16, 24 or 32")]
    InvalidKeyLength { received: usize },

    #[error("the received ciphertext is too short. Got: {received}, but expected at least {minimum}")]
    CiphertextTooShort { received: usize, minimum: usize },

    #[error("failed to encrypt the provided payload")]
    EncryptionFailure,

    #[error("failed to decrypt the provided ciphertext - either the key is wrong or the data got tampered with")]
    DecryptionFailure,

    #[error("rsa operation failed: {source}")]
    RsaFailure {
        #[from]
        source: rsa::Error,
    },

    #[error("the provided rsa public key is malformed: {message}")]
    MalformedPublicKey { message: String },

    #[error("the provided value is not valid base64: {source}")]
    MalformedBase64 {
        #[from]
        source: base64::DecodeError,
    },
}
