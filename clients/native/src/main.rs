// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use clap::{crate_name, crate_version, Parser};
use hopwire_bin_common::logging::{maybe_print_banner, setup_tracing_logger};

mod commands;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = commands::Cli::parse();

    if !args.no_banner {
        maybe_print_banner(crate_name!(), crate_version!());
    }
    setup_tracing_logger();

    commands::execute(args).await
}
