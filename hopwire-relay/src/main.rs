// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use clap::{crate_name, crate_version, Parser};
use hopwire_bin_common::logging::{maybe_print_banner, setup_tracing_logger};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    setup_tracing_logger();

    if !cli.no_banner {
        maybe_print_banner(crate_name!(), crate_version!());
    }

    cli.execute().await?;
    Ok(())
}
