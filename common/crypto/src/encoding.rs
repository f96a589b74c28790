// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Every binary value crossing a hop boundary uses the standard, padded base64 alphabet.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub fn encode_base64<T: AsRef<[u8]>>(bytes: T) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64<T: AsRef<[u8]>>(encoded: T) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(encoded)
}
