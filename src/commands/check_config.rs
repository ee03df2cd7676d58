//! `dictkv check-config` - validate configuration without starting.

use std::path::Path;

use anyhow::Result;

use crate::config::DictConfig;

pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = DictConfig::resolve(config_path)?;
    let validation = config.validate()?;

    for warning in &validation.warnings {
        eprintln!("warning: {warning}");
    }

    let exp = &config.expiration;
    println!("Configuration OK");
    println!(
        "  expiration: default {}s, max {}s, cleanup every {}s",
        exp.default_expiration_in_seconds,
        exp.max_expiration_in_seconds,
        exp.cleanup_period_in_seconds
    );
    println!(
        "  server:     {}:{} (auth {})",
        config.server.host,
        config.server.port,
        if config.server.api_key.is_some() { "on" } else { "off" }
    );
    println!("  snapshot:   {}", config.persistence.snapshot_path.display());
    Ok(())
}
