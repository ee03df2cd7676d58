//! API key middleware for the key routes.
//!
//! The caller sends the shared secret in the `ApiKey` header. With no key
//! configured every request passes.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use super::audit::{AuditEvent, log_audit_event};
use super::{AppError, AppState};
use crate::constants::API_KEY_HEADER;
use crate::daemon::metrics;

pub(crate) const MISSING_KEY_MESSAGE: &str = "Api Key was not provided.";
pub(crate) const WRONG_KEY_MESSAGE: &str = "Unauthorized client.";

/// Constant-time equality. Length is compared first; the expected key's
/// length is not treated as secret.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

pub(crate) async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.api_key.as_deref() else {
        return Ok(next.run(request).await);
    };

    // Only present when served with `into_make_service_with_connect_info`
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    let reason = match request.headers().get(API_KEY_HEADER) {
        None => Some(MISSING_KEY_MESSAGE),
        Some(provided) if !constant_time_compare(provided.as_bytes(), expected.as_bytes()) => {
            Some(WRONG_KEY_MESSAGE)
        },
        Some(_) => None,
    };

    if let Some(reason) = reason {
        metrics::record_auth_failure();
        log_audit_event(AuditEvent::AuthFailure {
            remote_addr,
            path: request.uri().path().to_string(),
            reason,
        });
        return Err(AppError::Unauthorized(reason));
    }

    log_audit_event(AuditEvent::AuthSuccess { remote_addr });
    Ok(next.run(request).await)
}
