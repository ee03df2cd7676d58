//! Key route handlers plus health and metrics.

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::debug;

use super::types::{HealthResponse, ValuesRequest};
use super::{AppError, AppState};
use crate::daemon::metrics;

/// 201 with `Location: <key>` and the values this request wrote.
///
/// The body is built from the request rather than a read-back, so a
/// concurrent DELETE or POST on the same key cannot leak into it.
fn created(key: &str, values: Vec<Value>) -> Response {
    let mut response = (StatusCode::CREATED, Json(values)).into_response();
    // Keys that are not valid header text just go without a Location
    if let Ok(location) = HeaderValue::from_str(key) {
        response.headers_mut().insert(header::LOCATION, location);
    }
    response
}

/// GET /{key} - Values for a key, `[]` if absent.
pub(crate) async fn get_values(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<Vec<Value>> {
    metrics::record_operation("get");
    Json(state.store.get(&key))
}

/// POST /{key} - Create or replace.
pub(crate) async fn create(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ValuesRequest>,
) -> Response {
    metrics::record_operation("create");
    debug!(%key, count = req.values.len(), ttl = ?req.expiration_in_seconds, "create");
    let written = req.values.clone();
    state
        .store
        .create(&key, req.values, req.expiration_in_seconds);
    created(&key, written)
}

/// PUT /{key} - Create only if absent, 409 otherwise.
pub(crate) async fn append(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<ValuesRequest>,
) -> Result<Response, AppError> {
    metrics::record_operation("append");
    let written = req.values.clone();
    if !state
        .store
        .create_if_absent(&key, req.values, req.expiration_in_seconds)
    {
        metrics::record_conflict();
        debug!(%key, "append conflict");
        return Err(AppError::Conflict(format!("Key '{key}' already exists")));
    }
    Ok(created(&key, written))
}

/// DELETE /{key} - Always 200, present or not.
pub(crate) async fn delete(State(state): State<AppState>, Path(key): Path<String>) -> StatusCode {
    metrics::record_operation("delete");
    let removed = state.store.delete(&key);
    debug!(%key, removed, "delete");
    StatusCode::OK
}

/// GET /health
pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        records: state.store.len(),
    })
}

/// GET /metrics - Prometheus text format.
pub(crate) async fn prometheus(State(state): State<AppState>) -> Result<String, AppError> {
    let handle = state.metrics.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Metrics recorder is not installed".to_string())
    })?;
    metrics::set_record_count(state.store.len());
    Ok(handle.render())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::services::kv::{ExpirationPolicy, Store};
    use http_body_util::BodyExt;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_created_body_is_independent_of_store() {
        let response = created("k", vec![json!("written")]);
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[header::LOCATION], "k");
        assert_eq!(body_json(response).await, json!(["written"]));
    }

    #[tokio::test]
    async fn test_created_skips_location_for_non_header_key() {
        let response = created("ключ", vec![]);
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().get(header::LOCATION).is_none());
    }

    #[tokio::test]
    async fn test_create_returns_values_even_if_key_replaced() {
        let state = AppState::new(Store::new(ExpirationPolicy::new(10, 20)), None);
        let req = ValuesRequest {
            values: vec![json!(1), json!({"a": 2})],
            expiration_in_seconds: None,
        };

        let response = create(State(state.clone()), Path("k".to_string()), Json(req)).await;
        // a later writer does not change what the first response reported
        state.store.create("k", vec![json!("other")], None);

        assert_eq!(body_json(response).await, json!([1, {"a": 2}]));
        assert_eq!(state.store.get("k"), vec![json!("other")]);
    }

    #[tokio::test]
    async fn test_append_conflict_leaves_existing_values() {
        let state = AppState::new(Store::new(ExpirationPolicy::new(10, 20)), None);
        state.store.create("k", vec![json!("first")], None);
        let req = ValuesRequest {
            values: vec![json!("second")],
            expiration_in_seconds: None,
        };

        let result = append(State(state.clone()), Path("k".to_string()), Json(req)).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(state.store.get("k"), vec![json!("first")]);
    }
}
