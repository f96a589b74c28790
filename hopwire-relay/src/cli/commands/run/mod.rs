// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use hopwire_bin_common::signal::wait_for_signal;
use hopwire_relay::error::RelayNodeError;
use hopwire_relay::RelayNode;
use tracing::{info, trace};

mod args;

pub(crate) use args::Args;

pub(crate) async fn execute(args: Args) -> Result<(), RelayNodeError> {
    trace!("passed arguments: {args:#?}");

    let config = args.build_config()?;
    let node = RelayNode::new(config).await?;
    let shutdown = node.shutdown_token();

    tokio::spawn(async move {
        wait_for_signal().await;
        info!("received shutdown signal. stopping the relay");
        shutdown.cancel();
    });

    node.run().await
}
