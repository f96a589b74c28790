// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::error::RelayNodeError;
use hopwire_session_store::DEFAULT_SESSION_TTL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_FORWARD_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_PURGE_INTERVAL: Duration = Duration::from_secs(5 * 60);

// every layer grows the payload roughly 2.4 times (base64 of the ciphertext of base64),
// so this is enough for a ~1MiB payload travelling through three relays
pub const DEFAULT_MAX_REQUEST_BODY: usize = 32 * 1024 * 1024;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    // additional metadata holding on-disk location of this config file
    #[serde(skip)]
    pub(crate) save_path: Option<PathBuf>,

    pub http: Http,

    pub sessions: Sessions,

    pub forwarding: Forwarding,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Serialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Http {
    /// Socket address this relay will use for binding its http API.
    /// default: `0.0.0.0:8080`
    pub bind_address: SocketAddr,

    /// Largest request body, in bytes, accepted by any of the endpoints.
    /// Entry relays of long circuits see the biggest bodies as they carry every layer.
    /// default: 32MiB
    pub max_request_body: usize,
}

impl Default for Http {
    fn default() -> Self {
        Http {
            bind_address: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_HTTP_PORT),
            max_request_body: DEFAULT_MAX_REQUEST_BODY,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Serialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Sessions {
    /// Lifetime of every session established with this relay. Sessions can't be refreshed.
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,

    /// How often expired sessions are removed from memory.
    #[serde(with = "humantime_serde")]
    pub purge_interval: Duration,
}

impl Default for Sessions {
    fn default() -> Self {
        Sessions {
            ttl: DEFAULT_SESSION_TTL,
            purge_interval: DEFAULT_PURGE_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Serialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct Forwarding {
    /// Maximum duration of a single call made to the successor of this relay.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for Forwarding {
    fn default() -> Self {
        Forwarding {
            request_timeout: DEFAULT_FORWARD_TIMEOUT,
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_bind_address(mut self, bind_address: SocketAddr) -> Self {
        self.http.bind_address = bind_address;
        self
    }

    #[must_use]
    pub fn with_max_request_body(mut self, max_request_body: usize) -> Self {
        self.http.max_request_body = max_request_body;
        self
    }

    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.sessions.ttl = ttl;
        self
    }

    #[must_use]
    pub fn with_purge_interval(mut self, purge_interval: Duration) -> Self {
        self.sessions.purge_interval = purge_interval;
        self
    }

    #[must_use]
    pub fn with_forward_timeout(mut self, request_timeout: Duration) -> Self {
        self.forwarding.request_timeout = request_timeout;
        self
    }

    pub fn validate(&self) -> Result<(), RelayNodeError> {
        if self.http.max_request_body == 0 {
            return Err(RelayNodeError::InvalidConfig {
                message: "maximum request body size must be non-zero".to_string(),
            });
        }
        if self.sessions.purge_interval.is_zero() {
            return Err(RelayNodeError::InvalidConfig {
                message: "session purge interval must be non-zero".to_string(),
            });
        }
        if self.forwarding.request_timeout.is_zero() {
            return Err(RelayNodeError::InvalidConfig {
                message: "forwarding request timeout must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn save_path(&self) -> Option<&Path> {
        self.save_path.as_deref()
    }

    pub fn read_from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, RelayNodeError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|source| RelayNodeError::ConfigLoadFailure {
                path: path.to_path_buf(),
                source,
            })?;
        let mut loaded: Config =
            toml::from_str(&content).map_err(|source| RelayNodeError::ConfigParseFailure {
                path: path.to_path_buf(),
                source,
            })?;
        loaded.validate()?;
        loaded.save_path = Some(path.to_path_buf());
        debug!("loaded config file from {}", path.display());
        Ok(loaded)
    }

    pub fn save_to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<(), RelayNodeError> {
        let path = path.as_ref();
        let serialised = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| RelayNodeError::ConfigSaveFailure {
                path: path.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, serialised).map_err(|source| RelayNodeError::ConfigSaveFailure {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("saved config file to {}", path.display());
        Ok(())
    }
}
