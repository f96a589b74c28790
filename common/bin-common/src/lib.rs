// Copyright 2021 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub mod build_information;
pub mod logging;

#[cfg(feature = "signal")]
pub mod signal;
