// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use hopwire_session_store::SessionStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Background task periodically removing expired sessions from the store.
pub struct SessionPurger {
    store: Arc<dyn SessionStore>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl SessionPurger {
    pub fn new(store: Arc<dyn SessionStore>, interval: Duration, shutdown: CancellationToken) -> Self {
        SessionPurger {
            store,
            interval,
            shutdown,
        }
    }

    async fn purge(&self) {
        let start = Instant::now();
        match self.store.purge_expired().await {
            Ok(0) => {}
            Ok(removed) => info!(
                "session cleanup: removed {removed} expired sessions (took {:.3}s)",
                start.elapsed().as_secs_f64()
            ),
            Err(err) => warn!("failed to purge expired sessions: {err}"),
        }
    }

    pub async fn run(self) {
        let mut purge_interval = tokio::time::interval(self.interval);
        purge_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    debug!("session purger: received shutdown signal");
                    break;
                }

                _ = purge_interval.tick() => self.purge().await,
            }
        }
    }
}
