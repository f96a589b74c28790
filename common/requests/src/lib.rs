// Copyright 2020-2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub mod error;
pub mod forward;
pub mod key_exchange;
pub mod models;
pub mod onion;

pub use error::RequestsError;
pub use forward::ForwardRequest;
pub use models::*;

/// Names of the endpoints exposed by every relay. Inside a `redirect` layer they double as the
/// `MsgType` telling the relay which endpoint of its successor the payload should be posted to.
pub mod message_types {
    pub const GET_AES: &str = "get-aes";
    pub const SET_REDIRECT: &str = "set-redirect";
    pub const REDIRECT: &str = "redirect";
}

/// Value returned in the `Message` field of a successful `set-redirect`.
pub const SET_REDIRECT_OK: &str = "OK";
