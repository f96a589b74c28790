// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::commands::CircuitArgs;
use tracing::info;

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    #[clap(flatten)]
    pub(crate) circuit: CircuitArgs,

    /// Endpoint of the destination the request is meant for, e.g. `auth/register`.
    #[clap(long)]
    pub(crate) endpoint: String,

    /// Json body of the request.
    #[clap(long, default_value = "{}")]
    pub(crate) body: String,
}

pub(crate) async fn execute(args: Args) -> anyhow::Result<()> {
    // refuse to send garbage before spending time on building the circuit
    let body: serde_json::Value = serde_json::from_str(&args.body)?;

    let circuit = args.circuit.build_circuit().await?;
    let response = circuit.send(&args.endpoint, &body).await?;
    info!("received {} bytes from {}", response.len(), circuit.destination());

    println!("{}", String::from_utf8_lossy(&response));
    Ok(())
}
