// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::config::Config;
use crate::engine::RelayEngine;
use crate::error::RelayNodeError;
use crate::http::{HttpServer, RelayRouter};
use crate::purger::SessionPurger;
use hopwire_session_store::{InMemorySessionStore, SessionStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// A bound, but not yet running, relay.
pub struct RelayNode {
    http_server: HttpServer,
    purger: SessionPurger,
    shutdown: CancellationToken,
}

impl RelayNode {
    /// Binds a relay keeping its sessions in memory.
    pub async fn new(config: Config) -> Result<Self, RelayNodeError> {
        let store = Arc::new(InMemorySessionStore::new(config.sessions.ttl));
        Self::with_store(config, store).await
    }

    pub async fn with_store(
        config: Config,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, RelayNodeError> {
        config.validate()?;

        let client = hopwire_http_client::Client::new(config.forwarding.request_timeout)?;
        let engine = RelayEngine::new(store.clone(), client);
        let router = RelayRouter::new(engine, config.http.max_request_body).into_inner();

        let http_server = HttpServer::bind(router, config.http.bind_address).await?;
        let shutdown = CancellationToken::new();
        let purger = SessionPurger::new(store, config.sessions.purge_interval, shutdown.clone());

        Ok(RelayNode {
            http_server,
            purger,
            shutdown,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, RelayNodeError> {
        self.http_server.local_addr()
    }

    /// Token that, once cancelled, gracefully stops the relay.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub async fn run(self) -> Result<(), RelayNodeError> {
        info!("starting relay on {}", self.local_addr()?);

        let purger_handle = tokio::spawn(self.purger.run());
        let res = self
            .http_server
            .run(self.shutdown.clone().cancelled_owned())
            .await;

        // make sure the purger stops even if the server has failed on its own
        self.shutdown.cancel();
        if let Err(err) = purger_handle.await {
            error!("the session purger has panicked: {err}");
        }

        info!("the relay has shut down");
        res
    }
}
