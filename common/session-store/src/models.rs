// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use hopwire_crypto::SessionKey;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub aes_key: SessionKey,

    /// Address of the successor. Empty until the client calls `set-redirect`.
    pub next_hop_address: String,

    pub created_at: Instant,

    pub ttl: Duration,
}

impl SessionRecord {
    pub fn new(aes_key: SessionKey, ttl: Duration) -> Self {
        SessionRecord {
            aes_key,
            next_hop_address: String::new(),
            created_at: Instant::now(),
            ttl,
        }
    }

    fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    pub fn is_expired(&self) -> bool {
        self.age() >= self.ttl
    }

    pub fn has_next_hop(&self) -> bool {
        !self.next_hop_address.is_empty()
    }
}
