// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

pub(crate) mod build_info;
pub(crate) mod init;
pub(crate) mod run;
