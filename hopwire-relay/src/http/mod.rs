// Copyright 2023-2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

pub mod middleware;
pub mod router;
pub mod server;
pub mod state;

pub use router::RelayRouter;
pub use server::HttpServer;
