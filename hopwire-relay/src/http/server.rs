// Copyright 2024-2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::error::RelayNodeError;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::WaitForCancellationFutureOwned;

pub struct HttpServer {
    router: Router,
    listener: TcpListener,
}

impl HttpServer {
    pub async fn bind(router: Router, bind_address: SocketAddr) -> Result<Self, RelayNodeError> {
        let listener = TcpListener::bind(bind_address)
            .await
            .map_err(|source| RelayNodeError::HttpBindFailure {
                bind_address,
                source,
            })?;
        Ok(HttpServer { router, listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, RelayNodeError> {
        self.listener
            .local_addr()
            .map_err(|source| RelayNodeError::HttpServerFailure { source })
    }

    pub async fn run(self, receiver: WaitForCancellationFutureOwned) -> Result<(), RelayNodeError> {
        // into_make_service_with_connect_info allows us to see client ip address
        // in middleware, for logging, routing etc.
        axum::serve(
            self.listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(receiver)
        .await
        .map_err(|source| RelayNodeError::HttpServerFailure { source })
    }
}
