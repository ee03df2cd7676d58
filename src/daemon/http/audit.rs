//! Security audit logging for API key checks.
//!
//! Events go to the `audit` tracing target so they can be filtered or
//! shipped separately (`RUST_LOG=audit=info`).

use std::net::SocketAddr;
use tracing::{debug, warn};

/// Security audit events emitted by the auth middleware.
#[derive(Debug, Clone)]
pub enum AuditEvent {
    /// Failed authentication attempt
    AuthFailure {
        remote_addr: Option<SocketAddr>,
        path: String,
        reason: &'static str,
    },
    /// Successful authentication (for correlation)
    AuthSuccess { remote_addr: Option<SocketAddr> },
}

/// Log a security audit event with structured fields.
pub fn log_audit_event(event: AuditEvent) {
    match event {
        AuditEvent::AuthFailure {
            remote_addr,
            path,
            reason,
        } => {
            warn!(
                target: "audit",
                event_type = "auth_failure",
                remote_addr = ?remote_addr,
                %path,
                reason,
                "Authentication failed"
            );
        },
        AuditEvent::AuthSuccess { remote_addr } => {
            debug!(
                target: "audit",
                event_type = "auth_success",
                remote_addr = ?remote_addr,
                "Authentication succeeded"
            );
        },
    }
}
