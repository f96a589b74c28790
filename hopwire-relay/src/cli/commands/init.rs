// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use hopwire_relay::config::Config;
use hopwire_relay::error::RelayNodeError;
use std::path::PathBuf;
use tracing::info;

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    /// Path of the configuration file to create.
    #[clap(long, env = "HOPWIRE_RELAY_CONFIG_FILE")]
    pub(crate) output: PathBuf,

    /// Overwrite the file if it already exists.
    #[clap(long, default_value_t = false)]
    pub(crate) force: bool,
}

pub(crate) fn execute(args: Args) -> Result<(), RelayNodeError> {
    if args.output.exists() && !args.force {
        return Err(RelayNodeError::InvalidConfig {
            message: format!(
                "'{}' already exists. use --force to overwrite it",
                args.output.display()
            ),
        });
    }

    Config::default().save_to_toml_file(&args.output)?;
    info!("wrote default configuration to {}", args.output.display());
    Ok(())
}
