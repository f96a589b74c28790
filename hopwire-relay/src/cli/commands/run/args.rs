// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use hopwire_relay::config::Config;
use hopwire_relay::error::RelayNodeError;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

#[derive(clap::Args, Debug)]
pub(crate) struct Args {
    /// Path to a configuration file. Values passed explicitly on the command line take precedence.
    #[clap(long, env = "HOPWIRE_RELAY_CONFIG_FILE")]
    pub(crate) config_file: Option<PathBuf>,

    /// Socket address this relay will use for binding its http API.
    #[clap(long, env = "HOPWIRE_RELAY_BIND_ADDRESS")]
    pub(crate) bind_address: Option<SocketAddr>,

    /// Largest accepted request body, in bytes.
    #[clap(long, env = "HOPWIRE_RELAY_MAX_REQUEST_BODY")]
    pub(crate) max_request_body: Option<usize>,

    /// Lifetime of every newly established session, e.g. "24h" or "30m".
    #[clap(long, value_parser = humantime::parse_duration, env = "HOPWIRE_RELAY_SESSION_TTL")]
    pub(crate) session_ttl: Option<Duration>,

    /// Interval between removals of expired sessions.
    #[clap(long, value_parser = humantime::parse_duration, env = "HOPWIRE_RELAY_PURGE_INTERVAL")]
    pub(crate) purge_interval: Option<Duration>,

    /// Maximum duration of a single forwarded request.
    #[clap(long, value_parser = humantime::parse_duration, env = "HOPWIRE_RELAY_FORWARD_TIMEOUT")]
    pub(crate) forward_timeout: Option<Duration>,
}

impl Args {
    pub(crate) fn build_config(&self) -> Result<Config, RelayNodeError> {
        let mut config = match &self.config_file {
            Some(path) => {
                info!("loading relay configuration from {}", path.display());
                Config::read_from_toml_file(path)?
            }
            None => {
                debug!("no configuration file provided. using the defaults");
                Config::default()
            }
        };

        if let Some(bind_address) = self.bind_address {
            config = config.with_bind_address(bind_address);
        }
        if let Some(max_request_body) = self.max_request_body {
            config = config.with_max_request_body(max_request_body);
        }
        if let Some(ttl) = self.session_ttl {
            config = config.with_session_ttl(ttl);
        }
        if let Some(purge_interval) = self.purge_interval {
            config = config.with_purge_interval(purge_interval);
        }
        if let Some(timeout) = self.forward_timeout {
            config = config.with_forward_timeout(timeout);
        }

        config.validate()?;
        Ok(config)
    }
}
