// Copyright 2021 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub mod asymmetric;
pub mod encoding;
pub mod error;
pub mod symmetric;

pub use asymmetric::oaep::{EphemeralKeyPair, PublicKey};
pub use error::CryptoError;
pub use symmetric::session_key::SessionKey;

// re-exported so that every crate draws its randomness from the same version of `rand`
pub use rand;
