// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::commands::CircuitArgs;

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    #[clap(flatten)]
    pub(crate) circuit: CircuitArgs,
}

pub(crate) async fn execute(args: Args) -> anyhow::Result<()> {
    let circuit = args.circuit.build_circuit().await?;

    println!("established a circuit of {} hop(s):", circuit.len());
    for (index, hop) in circuit.hops().iter().enumerate() {
        println!(
            "  {index}: {} (session {}) -> {}",
            hop.address, hop.session_token, hop.next_hop_address
        );
    }
    println!("destination: {}", circuit.destination());
    Ok(())
}
