// Copyright 2023-2025 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use crate::engine::RelayEngine;
use crate::http::middleware::logging;
use crate::http::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

pub mod relay;

pub(crate) mod routes {
    pub(crate) const GET_AES: &str = "/get-aes";
    pub(crate) const SET_REDIRECT: &str = "/set-redirect";
    pub(crate) const REDIRECT: &str = "/redirect";
}

pub struct RelayRouter {
    inner: Router,
}

impl RelayRouter {
    pub fn new(engine: RelayEngine, max_request_body: usize) -> RelayRouter {
        let state = AppState::new(engine, max_request_body);

        RelayRouter {
            inner: Router::new()
                .route(routes::GET_AES, post(relay::get_aes))
                .route(routes::SET_REDIRECT, post(relay::set_redirect))
                .route(routes::REDIRECT, post(relay::redirect))
                .layer(DefaultBodyLimit::max(max_request_body))
                .layer(axum::middleware::from_fn(logging::logger))
                .with_state(state),
        }
    }

    pub fn into_inner(self) -> Router {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_REQUEST_BODY;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use hopwire_crypto::rand::rngs::OsRng;
    use hopwire_requests::key_exchange::KeyExchangeInitiator;
    use hopwire_requests::{ErrorResponse, GetAesResponse};
    use hopwire_session_store::InMemorySessionStore;
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn router_with_body_limit(max_request_body: usize) -> Router {
        let engine = RelayEngine::new(
            Arc::new(InMemorySessionStore::default()),
            hopwire_http_client::Client::new(Duration::from_secs(5)).unwrap(),
        );
        RelayRouter::new(engine, max_request_body).into_inner()
    }

    fn router() -> Router {
        router_with_body_limit(DEFAULT_MAX_REQUEST_BODY)
    }

    fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn read_body(response: axum::response::Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    #[tokio::test]
    async fn get_aes_returns_cleartext_session() {
        let initiator = KeyExchangeInitiator::new(&mut OsRng).unwrap();
        let body = serde_json::to_vec(&initiator.request().unwrap()).unwrap();

        let response = router()
            .oneshot(post_json("/get-aes", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );

        let parsed: GetAesResponse = serde_json::from_slice(&read_body(response).await).unwrap();
        assert_eq!(parsed.session.len(), 64);
        assert!(initiator.complete(&parsed).is_ok());
    }

    #[tokio::test]
    async fn unparseable_bodies_are_rejected_in_cleartext() {
        for uri in ["/get-aes", "/set-redirect", "/redirect"] {
            let response = router()
                .oneshot(post_json(uri, "definitely not json"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");

            let error: ErrorResponse = serde_json::from_slice(&read_body(response).await).unwrap();
            assert!(error.error.starts_with("malformed request"), "{uri}");
        }
    }

    #[tokio::test]
    async fn redirect_with_unknown_session_is_unauthorized() {
        let body = r#"{"Session":"0000","Message":"aGVsbG8="}"#;
        let response = router()
            .oneshot(post_json("/redirect", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn only_post_is_routed() {
        let request = Request::builder()
            .method("GET")
            .uri("/get-aes")
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn oversized_bodies_are_rejected_with_a_structured_error() {
        let message = "A".repeat(8 * 1024);
        let body = format!(r#"{{"Session":"0000","Message":"{message}"}}"#);

        for uri in ["/get-aes", "/set-redirect", "/redirect"] {
            let response = router_with_body_limit(4 * 1024)
                .oneshot(post_json(uri, body.clone()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE, "{uri}");
            assert_eq!(
                response.headers().get("content-type").unwrap(),
                "application/json"
            );

            let error: ErrorResponse = serde_json::from_slice(&read_body(response).await).unwrap();
            assert_eq!(error.error, "request body exceeds the limit of 4096 bytes");
        }
    }

    #[tokio::test]
    async fn bodies_within_the_limit_reach_the_handlers() {
        let response = router_with_body_limit(4 * 1024)
            .oneshot(post_json("/redirect", r#"{"Session":"0000","Message":"aGVsbG8="}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
