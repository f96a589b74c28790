// Copyright 2024-2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use clap::Parser;
use hopwire_bin_common::bin_info;
use hopwire_bin_common::logging::setup_tracing_logger;
use hopwire_bin_common::signal::wait_for_signal;
use hopwire_echo_server::EchoServer;
use std::net::SocketAddr;
use std::sync::OnceLock;
use tracing::info;

fn pretty_build_info_static() -> &'static str {
    static PRETTY_BUILD_INFORMATION: OnceLock<String> = OnceLock::new();
    PRETTY_BUILD_INFORMATION.get_or_init(|| bin_info!().pretty_print())
}

#[derive(Parser, Debug)]
#[clap(author = "Nymtech", version, long_version = pretty_build_info_static(), about)]
struct Cli {
    /// Socket address the echo server will listen on.
    #[clap(
        long,
        default_value = "127.0.0.1:9000",
        env = "HOPWIRE_ECHO_SERVER_BIND_ADDRESS"
    )]
    bind_address: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing_logger();
    let args = Cli::parse();

    let server = EchoServer::bind(args.bind_address).await?;
    let cancel_token = server.cancel_token();
    let handle = tokio::spawn(server.run());

    wait_for_signal().await;
    info!("shutting down the echo server");
    cancel_token.cancel();

    handle.await?
}
