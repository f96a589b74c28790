// Copyright 2023-2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::engine::RelayEngine;
use std::ops::Deref;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(engine: RelayEngine, max_request_body: usize) -> Self {
        AppState {
            inner: Arc::new(AppStateInner {
                engine,
                max_request_body,
            }),
        }
    }
}

impl Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

pub struct AppStateInner {
    pub(crate) engine: RelayEngine,
    pub(crate) max_request_body: usize,
}
