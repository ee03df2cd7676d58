//! dictkv - ephemeral key-value store with sliding expiration.
//!
//! Each key holds an ordered list of JSON values and a TTL. Reads renew the
//! TTL, a background sweep evicts expired records, and the store is
//! snapshotted to a JSON file on shutdown and restored on startup.
//!
//! The engine lives in [`daemon::services::kv`]; [`daemon::http`] exposes
//! it over HTTP and [`daemon::run`] wires everything together.

pub mod commands;
pub mod config;
pub mod constants;
pub mod daemon;
pub mod error;

pub use error::{Error, Result};
