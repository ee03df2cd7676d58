//! Concurrent record map with sliding expiration.
//!
//! [`Store`] is the only owner of stored records. Callers get clones of the
//! values, never references into the map.

use super::clock::{Clock, SystemClock};
use super::persistence::SnapshotEntry;
use super::record::{ExpirationPolicy, Record};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::Value;
use std::sync::Arc;

struct StoreInner {
    records: DashMap<String, Record>,
    policy: ExpirationPolicy,
    clock: Arc<dyn Clock>,
}

/// Ephemeral key-value store: key → ordered list of JSON values with a TTL.
///
/// # Thread Safety
///
/// `Store` is `Clone` and can be shared across tasks. Records live in a
/// `DashMap`, so every operation is atomic for its key while operations on
/// keys in different shards run in parallel. No lock is ever held across an
/// `.await`.
///
/// # Example
///
/// ```
/// use dictkv::daemon::services::kv::{ExpirationPolicy, Store};
/// use serde_json::json;
///
/// let store = Store::new(ExpirationPolicy::new(10, 20));
/// store.create("123", vec![json!("sample"), json!("value")], None);
///
/// assert_eq!(store.get("123"), vec![json!("sample"), json!("value")]);
/// assert!(!store.create_if_absent("123", vec![json!("other")], None));
/// ```
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Creates an empty store reading time from the system clock.
    pub fn new(policy: ExpirationPolicy) -> Self {
        Self::with_clock(policy, SystemClock)
    }

    /// Creates an empty store with a custom time source.
    pub fn with_clock<C: Clock>(policy: ExpirationPolicy, clock: C) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                records: DashMap::new(),
                policy,
                clock: Arc::new(clock),
            }),
        }
    }

    /// Returns the TTL policy applied to new records.
    pub fn policy(&self) -> ExpirationPolicy {
        self.inner.policy
    }

    /// Inserts or replaces the record for `key`.
    ///
    /// The TTL is `min(ttl or default, max)`. Any previous values and
    /// expiration are discarded.
    pub fn create(&self, key: &str, values: Vec<Value>, ttl: Option<u64>) {
        let record = self.new_record(values, ttl);
        self.inner.records.insert(key.to_string(), record);
    }

    /// Inserts a record only if `key` is absent.
    ///
    /// Returns `false` without touching the existing record when the key is
    /// already present. Values are never merged. Uses the same TTL clamping
    /// as [`Store::create`].
    #[doc(alias = "append")]
    pub fn create_if_absent(&self, key: &str, values: Vec<Value>, ttl: Option<u64>) -> bool {
        match self.inner.records.entry(key.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(self.new_record(values, ttl));
                true
            },
        }
    }

    /// Removes the record for `key`.
    ///
    /// Returns `true` if a record was removed. Deleting an absent key is a
    /// no-op.
    pub fn delete(&self, key: &str) -> bool {
        self.inner.records.remove(key).is_some()
    }

    /// Returns the values stored under `key`, or an empty list.
    ///
    /// A hit renews the record: its deadline moves to `now + interval`,
    /// using the interval chosen at creation. A record past its deadline
    /// that the sweep has not reaped yet is still returned and renewed.
    pub fn get(&self, key: &str) -> Vec<Value> {
        let Some(mut record) = self.inner.records.get_mut(key) else {
            return Vec::new();
        };
        record.renew(self.inner.clock.now());
        record.values.clone()
    }

    /// Removes every record whose deadline is strictly before now.
    ///
    /// `now` is read once per pass. Shards are visited one at a time, so a
    /// record renewed by a concurrent `get` may survive until the next pass.
    /// Returns the number of evicted records.
    pub fn cleanup(&self) -> usize {
        let now = self.inner.clock.now();
        let mut evicted = 0;
        self.inner.records.retain(|_, record| {
            let keep = !record.is_expired(now);
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    /// Returns a copy of the record without renewing it.
    pub fn peek(&self, key: &str) -> Option<Record> {
        self.inner.records.get(key).map(|r| r.value().clone())
    }

    /// Number of records, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.inner.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.records.is_empty()
    }

    /// Copies every record out for persistence.
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        self.inner
            .records
            .iter()
            .map(|entry| SnapshotEntry {
                key: entry.key().clone(),
                value: entry.value().clone(),
            })
            .collect()
    }

    /// Inserts persisted records as-is.
    ///
    /// TTLs are not re-clamped and stale deadlines are kept; the next sweep
    /// reaps them. Keys already present are left alone. Returns the number
    /// of records inserted.
    pub fn restore<I>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = SnapshotEntry>,
    {
        let mut restored = 0;
        for SnapshotEntry { key, value } in entries {
            if let Entry::Vacant(slot) = self.inner.records.entry(key) {
                slot.insert(value);
                restored += 1;
            }
        }
        restored
    }

    fn new_record(&self, values: Vec<Value>, ttl: Option<u64>) -> Record {
        let ttl = self.inner.policy.effective_ttl(ttl);
        Record::new(values, ttl, self.inner.clock.now())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("records", &self.inner.records.len())
            .field("policy", &self.inner.policy)
            .finish_non_exhaustive()
    }
}
