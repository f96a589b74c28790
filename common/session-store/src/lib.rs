// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use hopwire_crypto::SessionKey;

pub mod error;
pub mod in_memory;
pub mod models;

pub use error::SessionStoreError;
pub use in_memory::InMemorySessionStore;
pub use models::SessionRecord;

/// Default lifetime of a session. There is no way of refreshing it, once it elapses the client
/// has to rebuild its circuit.
pub const DEFAULT_SESSION_TTL: std::time::Duration = std::time::Duration::from_secs(24 * 60 * 60);

/// Number of random bytes in every session token.
pub const SESSION_TOKEN_BYTES: usize = 32;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a new session bound to `key`, without any forwarding address,
    /// and returns the token addressing it.
    async fn create_session(&self, key: SessionKey) -> Result<String, SessionStoreError>;

    /// Retrieves a copy of the session. Expired sessions are reported as missing
    /// even if they have not been purged yet.
    async fn pull(&self, token: &str) -> Result<SessionRecord, SessionStoreError>;

    /// Sets the address the session's traffic is forwarded to.
    async fn update_address(&self, token: &str, address: String) -> Result<(), SessionStoreError>;

    /// Removes all expired sessions, returning how many got removed.
    async fn purge_expired(&self) -> Result<usize, SessionStoreError>;
}
