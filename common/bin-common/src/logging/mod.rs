// Copyright 2022-2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use std::io::IsTerminal;

// every forwarded request goes through these, their debug output drowns out our own
#[cfg(feature = "basic_tracing")]
const QUIETENED_CRATES: &[&str] = &["hyper", "hyper_util", "reqwest", "rustls", "h2", "tower"];

/// `RUST_LOG` based filter defaulting to `INFO`, with the http stack capped at `WARN`
/// unless `RUST_LOG` explicitly mentions it.
#[cfg(feature = "basic_tracing")]
pub fn default_env_filter() -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::filter::LevelFilter;

    let explicit = std::env::var("RUST_LOG").unwrap_or_default();
    let mut filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(&explicit);

    for crate_name in QUIETENED_CRATES {
        if explicit.contains(crate_name) {
            continue;
        }
        if let Ok(directive) = format!("{crate_name}=warn").parse() {
            filter = filter.add_directive(directive);
        }
    }
    filter
}

/// Installs the global subscriber writing compact, line-annotated events to stderr.
#[cfg(feature = "basic_tracing")]
pub fn setup_tracing_logger() {
    use tracing_subscriber::prelude::*;

    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    // tests spawning multiple nodes in one process might attempt to initialise it more than once
    let _ = tracing_subscriber::registry()
        .with(fmt)
        .with(default_env_filter())
        .try_init();
}

pub fn banner(crate_name: &str, crate_version: &str) -> String {
    format!(
        r#"

      _
     | |__   ___  _ ____      _(_)_ __ ___
     | '_ \ / _ \| '_ \ \ /\ / / | '__/ _ \
     | | | | (_) | |_) \ V  V /| | | |  __/
     |_| |_|\___/| .__/ \_/\_/ |_|_|  \___|
                 |_|

             ({crate_name} - version {crate_version})

    "#
    )
}

pub fn maybe_print_banner(crate_name: &str, crate_version: &str) {
    if std::io::stdout().is_terminal() {
        println!("{}", banner(crate_name, crate_version))
    }
}
