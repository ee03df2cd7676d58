//! HTTP transport over the store.
//!
//! Routes:
//!
//! | Method | Path       | Store call           | Success            |
//! |--------|------------|----------------------|--------------------|
//! | GET    | `/{key}`   | `get`                | 200 JSON array     |
//! | POST   | `/{key}`   | `create`             | 201 + `Location`   |
//! | PUT    | `/{key}`   | `create_if_absent`   | 201, 409 if exists |
//! | DELETE | `/{key}`   | `delete`             | 200                |
//! | GET    | `/health`  | `len`                | 200                |
//! | GET    | `/metrics` | -                    | 200 Prometheus     |
//!
//! Key routes require the `ApiKey` header when a key is configured.
//! `/health` and `/metrics` are open and shadow keys of the same name.

mod audit;
mod auth;
mod handlers;
pub mod types;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use metrics_exporter_prometheus::PrometheusHandle;

use crate::daemon::services::kv::Store;
use types::ErrorResponse;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub api_key: Option<Arc<str>>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(store: Store, api_key: Option<String>) -> Self {
        Self {
            store,
            api_key: api_key.map(Arc::from),
            metrics: None,
        }
    }

    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("auth", &self.api_key.is_some())
            .field("metrics", &self.metrics.is_some())
            .finish()
    }
}

/// Errors returned by handlers, rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the router with auth applied to the key routes only.
pub fn router(state: AppState) -> Router {
    let keys = Router::new()
        .route(
            "/{key}",
            get(handlers::get_values)
                .post(handlers::create)
                .put(handlers::append)
                .delete(handlers::delete),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::prometheus))
        .merge(keys)
        .with_state(state)
}
