//! Shared helpers for integration tests.
//!
//! `TestHost` wraps the router and drives it in-process with
//! `tower::ServiceExt::oneshot`; no socket is bound.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use dictkv::daemon::http::{AppState, router};
use dictkv::daemon::services::kv::{ExpirationPolicy, ManualClock, Store};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const API_KEY: &str = "test-key";

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).unwrap()
}

pub struct TestHostBuilder {
    policy: ExpirationPolicy,
    api_key: Option<String>,
}

impl TestHostBuilder {
    pub fn policy(mut self, default_secs: u64, max_secs: u64) -> Self {
        self.policy = ExpirationPolicy::new(default_secs, max_secs);
        self
    }

    pub fn without_auth(mut self) -> Self {
        self.api_key = None;
        self
    }

    pub fn start(self) -> TestHost {
        let clock = ManualClock::new(start_time());
        let store = Store::with_clock(self.policy, clock.clone());
        let app = router(AppState::new(store.clone(), self.api_key.clone()));
        TestHost {
            app,
            store,
            clock,
            api_key: self.api_key,
        }
    }
}

/// In-process server with a frozen clock.
pub struct TestHost {
    app: Router,
    pub store: Store,
    pub clock: ManualClock,
    api_key: Option<String>,
}

impl TestHost {
    /// default=10, max=20, auth on with [`API_KEY`].
    pub fn builder() -> TestHostBuilder {
        TestHostBuilder {
            policy: ExpirationPolicy::new(10, 20),
            api_key: Some(API_KEY.to_string()),
        }
    }

    /// Sends a request carrying the configured API key.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = &self.api_key {
            builder = builder.header("ApiKey", key);
        }
        self.send_raw(builder, body).await
    }

    /// Sends a request exactly as built, without adding the API key.
    pub async fn send_raw(
        &self,
        builder: axum::http::request::Builder,
        body: Option<Value>,
    ) -> Response<Body> {
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.app.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> Response<Body> {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> Response<Body> {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.send(Method::DELETE, uri, None).await
    }
}

pub async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
    resp.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(resp: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).expect("body is not JSON")
}

pub fn assert_status(resp: &Response<Body>, expected: StatusCode) {
    assert_eq!(resp.status(), expected, "unexpected status");
}
