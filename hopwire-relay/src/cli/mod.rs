// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use hopwire_bin_common::bin_info;
use hopwire_relay::error::RelayNodeError;
use std::sync::OnceLock;

mod commands;

// Helper for passing LONG_VERSION to clap
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

impl Cli {
    pub(crate) async fn execute(self) -> Result<(), RelayNodeError> {
        match self.command {
            Commands::BuildInfo => commands::build_info::execute(),
            Commands::Init(args) => commands::init::execute(args),
            Commands::Run(args) => commands::run::execute(*args).await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum Commands {
    /// Show build information of this binary
    BuildInfo,

    /// Write a configuration file populated with the default values
    Init(commands::init::Args),

    /// Start the relay
    Run(Box<commands::run::Args>),
}
