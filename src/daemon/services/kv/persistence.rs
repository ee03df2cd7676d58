//! Snapshot persistence for the store.
//!
//! The whole store is written to one JSON file at shutdown and read back at
//! startup. This is best-effort recovery, not durability: anything written
//! between two snapshots is lost on a crash.

use super::record::Record;
use super::store::Store;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// One persisted `(key, record)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotEntry {
    pub key: String,
    pub value: Record,
}

/// Writes every record in `store` to `path`, replacing the previous file.
///
/// The snapshot is written to a temporary file next to `path` and renamed
/// over it, so readers never observe a half-written snapshot. Returns the
/// number of records written.
pub fn save(store: &Store, path: &Path) -> Result<usize> {
    let entries = store.snapshot();
    let data = serde_json::to_vec(&entries)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .map_err(|e| Error::io(format!("creating snapshot directory {}", dir.display()), e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| Error::io(format!("creating temporary snapshot in {}", dir.display()), e))?;
    tmp.write_all(&data)
        .and_then(|()| tmp.as_file().sync_all())
        .map_err(|e| Error::io(format!("writing snapshot {}", tmp.path().display()), e))?;
    tmp.persist(path).map_err(|e| Error::persist(path, e.error))?;

    info!(path = %path.display(), records = entries.len(), "Snapshot saved");
    Ok(entries.len())
}

/// Reads a snapshot written by [`save`].
///
/// A missing file or unparseable contents yield an empty list, so the store
/// starts empty. Any other I/O failure (permissions, path is a directory)
/// is returned to the caller.
pub fn load(path: &Path) -> Result<Vec<SnapshotEntry>> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No snapshot found, starting empty");
            return Ok(Vec::new());
        },
        Err(e) => return Err(Error::io(format!("reading snapshot {}", path.display()), e)),
    };

    match serde_json::from_slice::<Vec<SnapshotEntry>>(&data) {
        Ok(entries) => Ok(entries),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Ignoring malformed snapshot, starting empty"
            );
            Ok(Vec::new())
        },
    }
}

/// Loads the snapshot at `path` into `store`. Returns the number of records
/// restored.
pub fn restore_into(store: &Store, path: &Path) -> Result<usize> {
    let entries = load(path)?;
    let total = entries.len();
    let restored = store.restore(entries);
    if total > 0 {
        info!(
            path = %path.display(),
            restored,
            skipped = total - restored,
            "Snapshot restored"
        );
    }
    Ok(restored)
}
