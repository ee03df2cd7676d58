//! Default values shared by configuration, the daemon and the CLI.

/// Default HTTP port for `dictkv serve`.
pub const DEFAULT_PORT: u16 = 5080;

/// Default bind address.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// TTL applied when a caller does not request one.
pub const DEFAULT_EXPIRATION_SECS: u64 = 60;

/// Hard ceiling for any TTL.
pub const MAX_EXPIRATION_SECS: u64 = 3600;

/// Largest accepted `max_expiration_in_seconds` (100 years). Keeps every
/// deadline well inside the range a snapshot can store.
pub const MAX_EXPIRATION_CEILING_SECS: u64 = 3_155_760_000;

/// Interval between sweep passes.
pub const DEFAULT_CLEANUP_PERIOD_SECS: u64 = 60;

/// Snapshot file written at shutdown and read at startup.
pub const DEFAULT_SNAPSHOT_FILE: &str = "data.json";

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "dictkv.toml";

/// Environment variable pointing at a config file.
pub const CONFIG_PATH_ENV: &str = "DICTKV_CONFIG";

/// Environment variable overriding `server.api_key`.
pub const API_KEY_ENV: &str = "DICTKV_API_KEY";

/// Request header carrying the API key.
pub const API_KEY_HEADER: &str = "ApiKey";
