// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use hopwire_bin_common::bin_info;
use hopwire_client::{Circuit, CircuitBuilder, ClientConfig};
use std::sync::OnceLock;
use std::time::Duration;

pub(crate) mod build;
pub(crate) mod send;

fn pretty_build_info_static() -> &'static str {
    static PRETTY_BUILD_INFORMATION: OnceLock<String> = OnceLock::new();
    PRETTY_BUILD_INFORMATION.get_or_init(|| bin_info!().pretty_print())
}

#[derive(Parser, Debug)]
#[clap(author = "Nymtech", version, long_version = pretty_build_info_static(), about)]
pub(crate) struct Cli {
    /// Flag used for disabling the printed banner in tty.
    #[clap(long)]
    pub(crate) no_banner: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Build a circuit and print the resulting chain of relays
    Build(build::Args),

    /// Build a circuit and send a single request through it
    Send(send::Args),

    /// Show build information of this binary
    BuildInfo,
}

/// Arguments describing the circuit to build, shared by all commands talking to relays.
#[derive(clap::Args, Debug)]
pub(crate) struct CircuitArgs {
    /// Addresses of the relays to route through, starting with the entry relay.
    /// Either repeat the flag or provide a comma separated list.
    #[clap(
        long = "hop",
        required = true,
        value_delimiter = ',',
        env = "HOPWIRE_CLIENT_HOPS"
    )]
    pub(crate) hops: Vec<String>,

    /// Address of the service the last relay should forward to.
    #[clap(long, env = "HOPWIRE_CLIENT_DESTINATION")]
    pub(crate) destination: String,

    /// Maximum duration of every call made to the entry relay.
    #[clap(long, value_parser = humantime::parse_duration, env = "HOPWIRE_CLIENT_REQUEST_TIMEOUT")]
    pub(crate) request_timeout: Option<Duration>,
}

impl CircuitArgs {
    pub(crate) fn config(&self) -> ClientConfig {
        let config = ClientConfig::default();
        match self.request_timeout {
            Some(timeout) => config.with_request_timeout(timeout),
            None => config,
        }
    }

    pub(crate) async fn build_circuit(&self) -> anyhow::Result<Circuit> {
        let client = self.config().build_http_client()?;
        let circuit = CircuitBuilder::new(client)
            .build(self.hops.as_slice(), self.destination.clone())
            .await?;
        Ok(circuit)
    }
}

pub(crate) async fn execute(args: Cli) -> anyhow::Result<()> {
    match args.command {
        Commands::Build(m) => build::execute(m).await,
        Commands::Send(m) => send::execute(m).await,
        Commands::BuildInfo => {
            println!("{}", bin_info!().pretty_print());
            Ok(())
        }
    }
}
