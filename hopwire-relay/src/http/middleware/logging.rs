// Copyright 2023-2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use axum::extract::Request;
use axum::http::header::{HOST, USER_AGENT};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::IntoResponse;
use std::time::Instant;
use tracing::info;

/// Simple logger for requests
pub async fn logger(req: Request, next: Next) -> impl IntoResponse {
    let method = req.method().to_string();
    let uri = req.uri().to_string();
    let agent = header_map(req.headers().get(USER_AGENT), "Unknown User Agent");
    let host = header_map(req.headers().get(HOST), "Unknown Host");

    let start = Instant::now();
    let res = next.run(req).await;
    let status = res.status();
    let taken = start.elapsed();

    info!("[{host}] {method} '{uri}': {status} / agent: {agent} / took: {taken:?}");

    res
}

fn header_map(header: Option<&HeaderValue>, fallback: &str) -> String {
    header
        .and_then(|value| value.to_str().ok())
        .unwrap_or(fallback)
        .to_string()
}
