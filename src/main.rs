use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use dictkv::commands::{self, LogFormat, serve::ServeOverrides};

// Fast allocator (musl's default allocator serializes across threads)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "dictkv")]
#[command(about = "Ephemeral key-value store with sliding expiration", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the store in the foreground
    Serve {
        /// Config file (default: $DICTKV_CONFIG, then ./dictkv.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override server.host
        #[arg(long)]
        host: Option<String>,
        /// Override server.port
        #[arg(short, long)]
        port: Option<u16>,
        /// Log output format
        #[arg(long, value_enum, default_value_t = LogFormat::Text)]
        log_format: LogFormat,
    },
    /// Validate configuration and print warnings
    CheckConfig {
        /// Config file (default: $DICTKV_CONFIG, then ./dictkv.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            log_format,
        } => {
            commands::serve::execute(config.as_deref(), ServeOverrides { host, port }, log_format)
                .await
        },
        Commands::CheckConfig { config } => commands::check_config::execute(config.as_deref()),
    }
}
