// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::SessionStoreError;
use crate::models::SessionRecord;
use crate::{SessionStore, DEFAULT_SESSION_TTL, SESSION_TOKEN_BYTES};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hopwire_crypto::SessionKey;
use rand::rngs::OsRng;
use rand::RngCore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

fn generate_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Sessions kept in a sharded concurrent map, so operations on a single token never
/// contend with operations on other tokens.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<DashMap<String, SessionRecord>>,
    session_ttl: Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        InMemorySessionStore::new(DEFAULT_SESSION_TTL)
    }
}

impl InMemorySessionStore {
    pub fn new(session_ttl: Duration) -> Self {
        InMemorySessionStore {
            sessions: Arc::new(DashMap::new()),
            session_ttl,
        }
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    /// Number of stored sessions, including the expired ones that are yet to be purged.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(&self, key: SessionKey) -> Result<String, SessionStoreError> {
        let record = SessionRecord::new(key, self.session_ttl);

        loop {
            let token = generate_token();
            if let Entry::Vacant(entry) = self.sessions.entry(token.clone()) {
                entry.insert(record);
                trace!("created new session");
                return Ok(token);
            }
        }
    }

    async fn pull(&self, token: &str) -> Result<SessionRecord, SessionStoreError> {
        match self.sessions.get(token) {
            Some(record) if !record.is_expired() => Ok(record.clone()),
            _ => Err(SessionStoreError::SessionNotFound),
        }
    }

    async fn update_address(&self, token: &str, address: String) -> Result<(), SessionStoreError> {
        match self.sessions.get_mut(token) {
            Some(mut record) if !record.is_expired() => {
                record.next_hop_address = address;
                Ok(())
            }
            _ => Err(SessionStoreError::SessionNotFound),
        }
    }

    async fn purge_expired(&self) -> Result<usize, SessionStoreError> {
        let mut removed = 0;
        self.sessions.retain(|_, record| {
            if record.is_expired() {
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            debug!("purged {removed} expired sessions");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn key() -> SessionKey {
        SessionKey::new(&mut OsRng)
    }

    #[tokio::test]
    async fn fresh_session_has_no_next_hop() {
        let store = InMemorySessionStore::default();
        let key = key();
        let token = store.create_session(key.clone()).await.unwrap();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

        let record = store.pull(&token).await.unwrap();
        assert_eq!(record.aes_key, key);
        assert!(record.next_hop_address.is_empty());
        assert!(!record.has_next_hop());
        assert_eq!(record.ttl, DEFAULT_SESSION_TTL);
    }

    #[tokio::test]
    async fn tokens_are_unique() {
        let store = InMemorySessionStore::default();
        let mut tokens = HashSet::new();
        for _ in 0..100 {
            assert!(tokens.insert(store.create_session(key()).await.unwrap()));
        }
        assert_eq!(store.len(), 100);
    }

    #[tokio::test]
    async fn address_updates_are_visible() {
        let store = InMemorySessionStore::default();
        let token = store.create_session(key()).await.unwrap();

        store
            .update_address(&token, "127.0.0.1:9000".to_string())
            .await
            .unwrap();
        let record = store.pull(&token).await.unwrap();
        assert_eq!(record.next_hop_address, "127.0.0.1:9000");
    }

    #[tokio::test]
    async fn unknown_tokens_are_not_found() {
        let store = InMemorySessionStore::default();
        assert!(matches!(
            store.pull("deadbeef").await,
            Err(SessionStoreError::SessionNotFound)
        ));
        assert!(matches!(
            store.update_address("deadbeef", "addr".to_string()).await,
            Err(SessionStoreError::SessionNotFound)
        ));
    }

    #[tokio::test]
    async fn expired_sessions_are_treated_as_missing_before_purging() {
        let store = InMemorySessionStore::new(Duration::ZERO);
        let token = store.create_session(key()).await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(matches!(
            store.pull(&token).await,
            Err(SessionStoreError::SessionNotFound)
        ));
        assert!(matches!(
            store.update_address(&token, "addr".to_string()).await,
            Err(SessionStoreError::SessionNotFound)
        ));
    }

    #[tokio::test]
    async fn purging_only_removes_expired_sessions() {
        let short_lived = InMemorySessionStore::new(Duration::from_millis(50));
        let expiring = short_lived.create_session(key()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let fresh = short_lived.create_session(key()).await.unwrap();

        assert_eq!(short_lived.purge_expired().await.unwrap(), 1);
        assert_eq!(short_lived.len(), 1);
        assert!(short_lived.pull(&expiring).await.is_err());
        assert!(short_lived.pull(&fresh).await.is_ok());

        assert_eq!(short_lived.purge_expired().await.unwrap(), 0);
    }
}
