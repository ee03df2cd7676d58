//! CLI command implementations for dictkv.
//!
//! - [`serve`] - Run the daemon in the foreground
//! - [`check_config`] - Validate a config file and print warnings

pub mod check_config;
pub mod serve;

use clap::ValueEnum;

/// Log output format for `serve`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}
