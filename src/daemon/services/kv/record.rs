//! Stored record and the TTL policy applied to new records.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Serde helper for `DateTime<Utc>` as RFC3339 string.
pub(crate) mod datetime_rfc3339 {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

/// One stored entry: ordered values plus expiration metadata.
///
/// Field names serialize in PascalCase so snapshots stay readable by (and
/// from) earlier deployments that wrote `data.json` in that layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    /// TTL in seconds applied on every renewal.
    pub expiration_interval: u64,
    /// Instant after which the record is expired.
    #[serde(with = "datetime_rfc3339")]
    pub expiration_date: DateTime<Utc>,
    /// Opaque values, order preserved.
    pub values: Vec<Value>,
}

impl Record {
    /// Creates a record expiring `ttl_secs` after `now`.
    pub fn new(values: Vec<Value>, ttl_secs: u64, now: DateTime<Utc>) -> Self {
        Self {
            expiration_interval: ttl_secs,
            expiration_date: deadline(now, ttl_secs),
            values,
        }
    }

    /// Pushes the deadline to `now + expiration_interval`.
    pub fn renew(&mut self, now: DateTime<Utc>) {
        self.expiration_date = deadline(now, self.expiration_interval);
    }

    /// A record is expired strictly after its deadline.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date < now
    }
}

/// 9999-12-31T23:59:59Z, the last instant RFC 3339 can represent.
const LATEST_DEADLINE_TIMESTAMP: i64 = 253_402_300_799;

/// Upper bound for any deadline. Later dates serialize with an expanded
/// year (`+10000-...`) that cannot be read back from a snapshot.
pub(crate) fn latest_deadline() -> DateTime<Utc> {
    DateTime::from_timestamp(LATEST_DEADLINE_TIMESTAMP, 0).unwrap_or_default()
}

fn deadline(now: DateTime<Utc>, ttl_secs: u64) -> DateTime<Utc> {
    let latest = latest_deadline();
    i64::try_from(ttl_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .map_or(latest, |date| date.min(latest))
}

/// TTL defaults and ceiling applied to create and create-if-absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    /// TTL used when the caller does not ask for one.
    pub default_secs: u64,
    /// Ceiling; larger requests are clamped down to it.
    pub max_secs: u64,
}

impl ExpirationPolicy {
    pub fn new(default_secs: u64, max_secs: u64) -> Self {
        Self {
            default_secs,
            max_secs,
        }
    }

    /// `min(requested or default, max)`. Over-limit requests are silently
    /// reduced, never rejected.
    pub fn effective_ttl(&self, requested: Option<u64>) -> u64 {
        requested.unwrap_or(self.default_secs).min(self.max_secs)
    }
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self::new(
            crate::constants::DEFAULT_EXPIRATION_SECS,
            crate::constants::MAX_EXPIRATION_SECS,
        )
    }
}
