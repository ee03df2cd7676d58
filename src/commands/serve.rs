//! `dictkv serve` - run the daemon in the foreground.

use std::path::Path;

use anyhow::Result;
use tracing::warn;

use super::LogFormat;
use crate::config::DictConfig;
use crate::daemon;

/// Command-line overrides applied on top of the resolved config.
#[derive(Debug, Default)]
pub struct ServeOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
}

pub async fn execute(
    config_path: Option<&Path>,
    overrides: ServeOverrides,
    log_format: LogFormat,
) -> Result<()> {
    init_tracing(log_format);

    let mut config = DictConfig::resolve(config_path)?;
    apply_overrides(&mut config, overrides);

    let validation = config.validate()?;
    for warning in &validation.warnings {
        warn!("{warning}");
    }

    daemon::run(config).await
}

fn apply_overrides(config: &mut DictConfig, overrides: ServeOverrides) {
    if let Some(host) = overrides.host {
        config.server.host = host;
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
}

/// Initialize stdout logging. `RUST_LOG` wins over the `info` default.
fn init_tracing(format: LogFormat) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry.with(fmt::layer()).init(),
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = DictConfig::default();
        apply_overrides(
            &mut config,
            ServeOverrides {
                host: Some("0.0.0.0".to_string()),
                port: Some(9999),
            },
        );
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn test_empty_overrides_keep_config() {
        let mut config = DictConfig::default();
        apply_overrides(&mut config, ServeOverrides::default());
        assert_eq!(config.server.host, crate::constants::DEFAULT_HOST);
        assert_eq!(config.server.port, crate::constants::DEFAULT_PORT);
    }
}
