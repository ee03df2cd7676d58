//! Embedded services backing the daemon.

pub mod kv;
