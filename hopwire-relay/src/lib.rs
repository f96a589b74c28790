// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod node;
pub mod purger;

pub use config::Config;
pub use engine::{RelayEngine, RelayResponse};
pub use error::{RelayError, RelayNodeError};
pub use node::RelayNode;
