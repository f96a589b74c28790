// Copyright 2024-2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use anyhow::Result;
use axum::extract::State;
use axum::http::Uri;
use axum::routing::post;
use axum::Router;
use bytes::Bytes;
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const METRICS_LOGGING_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
pub struct Metrics {
    total_requests: AtomicU64,
    bytes_recv: AtomicU64,
    bytes_sent: AtomicU64,

    hits: DashMap<String, u64>,
    last_bodies: DashMap<String, Bytes>,
}

impl Metrics {
    fn record(&self, path: &str, body: &Bytes) {
        let len = body.len() as u64;
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.bytes_recv.fetch_add(len, Ordering::Relaxed);
        *self.hits.entry(path.to_string()).or_insert(0) += 1;
        self.last_bodies.insert(path.to_string(), body.clone());
        self.bytes_sent.fetch_add(len, Ordering::Relaxed);
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Number of requests received on `path` (without the leading slash).
    pub fn hits(&self, path: &str) -> u64 {
        self.hits.get(path).map(|hits| *hits).unwrap_or_default()
    }

    /// Body of the most recent request received on `path` (without the leading slash).
    pub fn last_body(&self, path: &str) -> Option<Bytes> {
        self.last_bodies.get(path).map(|body| body.clone())
    }
}

async fn echo(State(metrics): State<Arc<Metrics>>, uri: Uri, body: Bytes) -> Bytes {
    let path = uri.path().trim_start_matches('/');
    debug!("echoing {} bytes received on /{path}", body.len());
    metrics.record(path, &body);
    body
}

pub struct EchoServer {
    listener: TcpListener,
    metrics: Arc<Metrics>,
    cancel_token: CancellationToken,
}

impl EchoServer {
    pub async fn bind<A: ToSocketAddrs>(listen_addr: A) -> Result<Self> {
        let listener = TcpListener::bind(listen_addr).await?;
        Ok(EchoServer {
            listener,
            metrics: Arc::new(Metrics::default()),
            cancel_token: CancellationToken::new(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/", post(echo))
            .route("/*path", post(echo))
            .with_state(self.metrics.clone())
    }

    pub async fn run(self) -> Result<()> {
        let router = self.router();
        info!("echo server listening on {}", self.local_addr()?);

        let all_metrics = self.metrics.clone();
        let metrics_cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(METRICS_LOGGING_INTERVAL);
            loop {
                tokio::select! {
                    _ = metrics_cancel.cancelled() => break,
                    _ = interval.tick() => {
                        info!(
                            "Metrics: total_requests_since_start={}, bytes_received={}, bytes_sent={}",
                            all_metrics.total_requests.load(Ordering::Relaxed),
                            all_metrics.bytes_recv.load(Ordering::Relaxed),
                            all_metrics.bytes_sent.load(Ordering::Relaxed),
                        );
                    }
                }
            }
        });

        let shutdown = self.cancel_token.clone();
        axum::serve(self.listener, router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await?;

        info!("echo server has shut down");
        Ok(())
    }
}
