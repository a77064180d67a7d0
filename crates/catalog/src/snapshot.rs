//! Local persisted snapshot of the catalog.
//!
//! A small key-value store backed by one file per key inside a data
//! directory. The catalog lives under [`CATALOG_KEY`] as a JSON array of
//! [`GameRecord`]s.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::SnapshotError;
use crate::types::GameRecord;

/// Key under which the catalog snapshot is stored.
pub const CATALOG_KEY: &str = "gaming-hub-games";

/// Key counting the local edits held in the catalog snapshot.
pub const UNSYNCED_KEY: &str = "gaming-hub-unsynced";

/// File-backed key-value store for the catalog snapshot.
///
/// Only the catalog store writes through this type.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Creates a store rooted at `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File path holding the value for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Reads the raw value for `key`, or `None` if it was never written.
    pub fn read(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the value for `key`.
    ///
    /// The value is written to a temporary file in the same directory and
    /// renamed over the old one, so readers see either the old or the new
    /// content, never a partial write.
    pub fn write(&self, key: &str, value: &str) -> Result<(), SnapshotError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        let result = write_synced(&tmp, value).and_then(|()| std::fs::rename(&tmp, &path));
        if let Err(e) = result {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    /// Removes the value for `key`. Missing keys are not an error.
    pub fn remove(&self, key: &str) -> Result<(), SnapshotError> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Loads the persisted catalog.
    ///
    /// Returns `Ok(None)` when nothing was persisted and
    /// [`SnapshotError::Corrupt`] when the content does not parse.
    /// Repeated ids keep their first occurrence.
    pub fn load_catalog(&self) -> Result<Option<Vec<GameRecord>>, SnapshotError> {
        let Some(data) = self.read(CATALOG_KEY)? else {
            return Ok(None);
        };
        let games: Vec<GameRecord> =
            serde_json::from_str(&data).map_err(|e| SnapshotError::Corrupt(e.to_string()))?;

        let mut seen = HashSet::new();
        let total = games.len();
        let games: Vec<GameRecord> = games
            .into_iter()
            .filter(|g| seen.insert(g.id.clone()))
            .collect();
        if games.len() != total {
            warn!(
                dropped = total - games.len(),
                "snapshot contained duplicate game ids"
            );
        }

        debug!(count = games.len(), path = ?self.path_for(CATALOG_KEY), "loaded catalog snapshot");
        Ok(Some(games))
    }

    /// Persists the full catalog, replacing any previous snapshot.
    pub fn save_catalog(&self, games: &[GameRecord]) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(games)?;
        self.write(CATALOG_KEY, &json)?;
        debug!(count = games.len(), path = ?self.path_for(CATALOG_KEY), "persisted catalog snapshot");
        Ok(())
    }

    /// Local edits held in the catalog snapshot.
    ///
    /// Only degraded-mode writes create the snapshot, so one that exists
    /// without a counter still holds at least one edit.
    pub fn load_unsynced(&self) -> Result<usize, SnapshotError> {
        if !self.path_for(CATALOG_KEY).exists() {
            return Ok(0);
        }
        match self.read(UNSYNCED_KEY)? {
            None => Ok(1),
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map(|n| n.max(1))
                .map_err(|e| SnapshotError::Corrupt(format!("edit counter {raw:?}: {e}"))),
        }
    }

    pub fn save_unsynced(&self, count: usize) -> Result<(), SnapshotError> {
        self.write(UNSYNCED_KEY, &count.to_string())
    }

    /// Drops the catalog snapshot together with its edit counter.
    pub fn clear_catalog(&self) -> Result<(), SnapshotError> {
        self.remove(UNSYNCED_KEY)?;
        self.remove(CATALOG_KEY)?;
        debug!(dir = ?self.dir, "cleared catalog snapshot");
        Ok(())
    }
}

fn write_synced(path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}

/// Returns the default data directory for the snapshot.
pub fn default_data_dir() -> Option<PathBuf> {
    config_dir().map(|d| d.join("gaming-hub"))
}

/// Returns the platform-specific config directory.
fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join(".config"))
    }
}
