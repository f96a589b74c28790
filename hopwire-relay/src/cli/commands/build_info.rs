// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use hopwire_bin_common::bin_info;
use hopwire_relay::error::RelayNodeError;

pub(crate) fn execute() -> Result<(), RelayNodeError> {
    println!("{}", bin_info!().pretty_print());
    Ok(())
}
