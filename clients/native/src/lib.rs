// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

pub mod circuit;
pub mod config;
pub mod error;
pub mod key_exchange;

pub use circuit::builder::CircuitBuilder;
pub use circuit::{decode_through_network, Circuit, Hop};
pub use config::ClientConfig;
pub use error::{CircuitBuildError, CircuitError, KeyExchangeError};
pub use key_exchange::HybridKeyExchange;
