//! Request and response bodies.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /{key}` and `PUT /{key}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuesRequest {
    pub values: Vec<Value>,
    /// Requested TTL; clamped to the configured maximum.
    #[serde(default)]
    pub expiration_in_seconds: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub records: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
