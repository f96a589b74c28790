// Copyright 2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! JSON bodies of the relay endpoints. Field names are part of the wire contract
//! and therefore deliberately not snake_case on the wire.

use serde::{Deserialize, Serialize};

/// Body of `POST /get-aes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAesRequest {
    /// base64 encoded DER `SubjectPublicKeyInfo` of the client's ephemeral RSA key.
    #[serde(rename = "RsaKey", alias = "rsa_key")]
    pub rsa_key: String,
}

/// Cleartext response of `POST /get-aes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetAesResponse {
    #[serde(rename = "Session", alias = "session")]
    pub session: String,

    /// Session key encrypted with RSA-OAEP(SHA-256) under the client's key, base64 encoded.
    #[serde(rename = "Aes_key", alias = "aes_key")]
    pub aes_key: String,
}

/// Body of `POST /set-redirect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetRedirectRequest {
    #[serde(rename = "Session", alias = "session")]
    pub session: String,

    /// `base64(AES-GCM(base64(address)))`
    #[serde(rename = "Addr", alias = "addr")]
    pub addr: String,
}

/// Body of `POST /redirect`, i.e. a single onion envelope as it travels between two adjacent hops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRequest {
    #[serde(rename = "Session", alias = "session")]
    pub session: String,

    /// `base64(AES-GCM(base64(json(RedirectPayload))))`
    #[serde(rename = "Message", alias = "message")]
    pub message: String,
}

/// What a single onion layer decrypts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectPayload {
    /// Endpoint of the next hop the payload is meant for.
    #[serde(rename = "MsgType", alias = "msg_type")]
    pub msg_type: String,

    /// base64 encoded body that is to be posted to the next hop.
    #[serde(rename = "Data", alias = "data", default)]
    pub data: String,
}

/// Every response protected with a session key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedResponse {
    /// `base64(AES-GCM(response bytes))`
    #[serde(rename = "Data", alias = "data", default)]
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(rename = "Message", alias = "message")]
    pub message: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        StatusResponse {
            message: crate::SET_REDIRECT_OK.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.message == crate::SET_REDIRECT_OK
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new<S: Into<String>>(error: S) -> Self {
        ErrorResponse {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_match_the_wire_contract() {
        let req = GetAesResponse {
            session: "abc".to_string(),
            aes_key: "def".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"Session":"abc","Aes_key":"def"}"#
        );

        let payload = RedirectPayload {
            msg_type: "redirect".to_string(),
            data: "Zm9v".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"MsgType":"redirect","Data":"Zm9v"}"#
        );
    }

    #[test]
    fn lowercase_field_names_are_accepted() {
        let req: SetRedirectRequest =
            serde_json::from_str(r#"{"session":"abc","addr":"def"}"#).unwrap();
        assert_eq!(req.session, "abc");
        assert_eq!(req.addr, "def");
    }

    #[test]
    fn responses_without_data_deserialise_as_empty() {
        let res: EncryptedResponse =
            serde_json::from_str(r#"{"Session":"abc","Aes_key":"def"}"#).unwrap();
        assert!(res.data.is_empty());

        let res: EncryptedResponse = serde_json::from_str(r#"{"error":"nope"}"#).unwrap();
        assert!(res.data.is_empty());
    }
}
