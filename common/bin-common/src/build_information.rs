// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Basic information about a binary, captured at compile time of the calling crate
/// via the [`bin_info!`](crate::bin_info) macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BinaryBuildInformation {
    pub binary_name: &'static str,
    pub build_version: &'static str,
    pub target_os: &'static str,
    pub target_arch: &'static str,
}

impl BinaryBuildInformation {
    /// Value sent in the `User-Agent` header of outbound http requests.
    pub fn user_agent(&self) -> String {
        format!(
            "{}/{}/{}-{}",
            self.binary_name, self.build_version, self.target_os, self.target_arch
        )
    }

    pub fn pretty_print(&self) -> String {
        format!(
            "{:<20}{}\n{:<20}{}\n{:<20}{}-{}",
            "Binary Name:",
            self.binary_name,
            "Build Version:",
            self.build_version,
            "Target:",
            self.target_os,
            self.target_arch
        )
    }
}

impl Display for BinaryBuildInformation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.binary_name, self.build_version)
    }
}

#[macro_export]
macro_rules! bin_info {
    () => {
        $crate::build_information::BinaryBuildInformation {
            binary_name: env!("CARGO_PKG_NAME"),
            build_version: env!("CARGO_PKG_VERSION"),
            target_os: ::std::env::consts::OS,
            target_arch: ::std::env::consts::ARCH,
        }
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn captures_the_calling_crate() {
        let info = crate::bin_info!();
        assert_eq!(info.binary_name, "hopwire-bin-common");
        assert!(info.user_agent().starts_with("hopwire-bin-common/"));

        let serialised = serde_json::to_value(info).unwrap();
        assert_eq!(serialised["build_version"], env!("CARGO_PKG_VERSION"));
    }
}
