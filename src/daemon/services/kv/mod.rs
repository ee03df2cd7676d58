//! Ephemeral key-value store with sliding expiration.
//!
//! Each key maps to an ordered list of JSON values and carries a TTL. Reads
//! push the deadline forward by the record's interval; a background sweep
//! evicts whatever has lapsed. The whole map can be snapshotted to a file at
//! shutdown and restored at startup.
//!
//! - [`Store`] - concurrent record map (create, create-if-absent, delete, get, cleanup)
//! - [`Record`] / [`ExpirationPolicy`] - stored entry and TTL clamping
//! - [`Clock`] - time source ([`SystemClock`], [`ManualClock`] for tests)
//! - [`CleanupScheduler`] - periodic sweep task
//! - [`persistence`] - snapshot save/load
//!
//! # Example
//!
//! ```
//! use chrono::{TimeDelta, TimeZone, Utc};
//! use dictkv::daemon::services::kv::{ExpirationPolicy, ManualClock, Store};
//! use serde_json::json;
//!
//! let clock = ManualClock::new(Utc.with_ymd_and_hms(2001, 2, 3, 4, 5, 6).unwrap());
//! let store = Store::with_clock(ExpirationPolicy::new(10, 20), clock.clone());
//!
//! store.create("123", vec![json!("sample"), json!("value")], None);
//! assert_eq!(store.peek("123").unwrap().expiration_interval, 10);
//!
//! clock.advance(TimeDelta::days(1));
//! store.cleanup();
//! assert!(store.get("123").is_empty());
//! ```

mod cleanup;
mod clock;
pub mod persistence;
mod record;
mod store;


// Re-export the public API
pub use cleanup::CleanupScheduler;
pub use clock::{Clock, ManualClock, SystemClock};
pub use persistence::SnapshotEntry;
pub use record::{ExpirationPolicy, Record};
pub use store::Store;
