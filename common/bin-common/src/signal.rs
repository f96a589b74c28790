// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use tracing::{info, warn};

/// Resolves once the process received SIGINT, SIGTERM or SIGQUIT.
#[cfg(unix)]
pub async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigquit) =
        match (signal(SignalKind::terminate()), signal(SignalKind::quit())) {
            (Ok(sigterm), Ok(sigquit)) => (sigterm, sigquit),
            _ => {
                warn!("failed to setup SIGTERM/SIGQUIT channels. only SIGINT will be handled");
                wait_for_ctrl_c().await;
                return;
            }
        };

    tokio::select! {
        _ = wait_for_ctrl_c() => {},
        _ = sigterm.recv() => {
            info!("Received SIGTERM");
        }
        _ = sigquit.recv() => {
            info!("Received SIGQUIT");
        }
    }
}

#[cfg(not(unix))]
pub async fn wait_for_signal() {
    wait_for_ctrl_c().await
}

async fn wait_for_ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(_) => info!("Received SIGINT"),
        Err(err) => {
            warn!("failed to listen for SIGINT: {err}");
            std::future::pending::<()>().await
        }
    }
}
