// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session does not exist or it has already expired")]
    SessionNotFound,
}
