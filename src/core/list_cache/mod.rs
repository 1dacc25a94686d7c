//! Allow-list / deny-list set membership, backed by a newline-delimited file and refreshed
//! periodically in the background (§4.1).

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::error::Result;

const RELOAD_INTERVAL: std::time::Duration = std::time::Duration::from_secs(5 * 60);

/// A single address-and-optional-note record as stored on disk.
fn parse_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.split_once(',') {
        Some((address, _note)) => Some(address.to_string()),
        None => Some(trimmed.to_string()),
    }
}

async fn read_set(path: &Path) -> Result<HashSet<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => Ok(contents.lines().filter_map(parse_line).collect()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tokio::fs::write(path, b"").await?;
            Ok(HashSet::new())
        }
        Err(err) => Err(err.into()),
    }
}

/// File-backed set membership cache, refreshed from disk every five minutes. Shared via `Arc`;
/// [`Self::spawn_reload_task`] hands back the background task's join handle so callers can await
/// shutdown if they want to.
pub struct ListCache {
    path: PathBuf,
    appendable: bool,
    set: Arc<RwLock<HashSet<String>>>,
}

impl ListCache {
    /// Constructs an allow list: read-only, never appended to at runtime.
    #[must_use]
    pub fn allow_list(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            appendable: false,
            set: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Constructs a deny list: [`Self::add`] is valid on this variant.
    #[must_use]
    pub fn deny_list(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            appendable: true,
            set: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Synchronously populates the in-memory set from disk. Must be called before
    /// [`Self::is_in_list`] returns meaningful results.
    pub async fn init(&self) -> Result<()> {
        let loaded = read_set(&self.path).await?;
        *self.set.write() = loaded;
        Ok(())
    }

    #[must_use]
    pub fn is_in_list(&self, address: &str) -> bool {
        self.set.read().contains(address)
    }

    /// Appends `address` to the backing file and inserts it into the in-memory set. A no-op if
    /// the address is already present. Only valid on a deny list.
    pub async fn add(&self, address: &str, note: Option<&Value>) -> Result<()> {
        debug_assert!(self.appendable, "add() called on a read-only allow list");
        if self.set.read().contains(address) {
            warn!(%address, "address already on the deny list, skipping append");
            return Ok(());
        }

        let line = match note {
            Some(note) => format!("{address},{note}\n"),
            None => format!("{address}\n"),
        };

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;

        self.set.write().insert(address.to_string());
        Ok(())
    }

    /// Spawns the 5-minute periodic reload task. Reload failures are logged and leave the
    /// previous snapshot in place.
    pub fn spawn_reload_task(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(RELOAD_INTERVAL);
            interval.tick().await; // first tick fires immediately; skip it, init() already ran.
            loop {
                interval.tick().await;
                match read_set(&cache.path).await {
                    Ok(loaded) => *cache.set.write() = loaded,
                    Err(err) => warn!(error = %err, path = %cache.path.display(), "list cache reload failed, keeping previous snapshot"),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn init_reads_existing_entries() {
        let file = NamedTempFile::new().unwrap();
        tokio::fs::write(file.path(), "AAA\nBBB,{\"reason\":\"test\"}\n\n").await.unwrap();

        let cache = ListCache::allow_list(file.path());
        cache.init().await.unwrap();

        assert!(cache.is_in_list("AAA"));
        assert!(cache.is_in_list("BBB"));
        assert!(!cache.is_in_list("CCC"));
    }

    #[tokio::test]
    async fn init_creates_missing_file_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deny.txt");

        let cache = ListCache::deny_list(&path);
        cache.init().await.unwrap();

        assert!(!cache.is_in_list("anything"));
        assert!(tokio::fs::metadata(&path).await.is_ok());
    }

    #[tokio::test]
    async fn add_is_idempotent_and_persists_to_disk() {
        let file = NamedTempFile::new().unwrap();
        let cache = ListCache::deny_list(file.path());
        cache.init().await.unwrap();

        cache.add("SCAMMINT111", None).await.unwrap();
        cache.add("SCAMMINT111", None).await.unwrap();

        assert!(cache.is_in_list("SCAMMINT111"));

        let contents = tokio::fs::read_to_string(file.path()).await.unwrap();
        assert_eq!(contents.matches("SCAMMINT111").count(), 1);
    }

    #[tokio::test]
    async fn reload_replaces_the_snapshot_atomically() {
        let file = NamedTempFile::new().unwrap();
        tokio::fs::write(file.path(), "OLD\n").await.unwrap();

        let cache = ListCache::allow_list(file.path());
        cache.init().await.unwrap();
        assert!(cache.is_in_list("OLD"));

        tokio::fs::write(file.path(), "NEW\n").await.unwrap();
        let reloaded = read_set(file.path()).await.unwrap();
        *cache.set.write() = reloaded;

        assert!(!cache.is_in_list("OLD"));
        assert!(cache.is_in_list("NEW"));
    }
}
