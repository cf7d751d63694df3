//! Expiring key-value caches used by the caller layer.
//!
//! Keys follow `"{namespace}:{path}"` (see [`content_key`]); the namespace
//! identifies the repository snapshot, e.g. `"/abs/root@<commit id>"`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

/// Key for a file's content within a repository snapshot.
pub fn content_key(namespace: &str, path: &str) -> String {
    format!("{namespace}:{path}")
}

/// Key-value store whose entries expire. Expiry is checked on read.
pub trait ExpiringCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String, ttl: Duration);
    fn remove(&self, key: &str);
    fn clear(&self);
}

#[derive(Debug)]
struct Entry {
    value: String,
    /// `None` when `now + ttl` is not representable; such entries never expire.
    expires_at: Option<Instant>,
}

/// In-process [`ExpiringCache`].
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until next read.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ExpiringCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.lock();
        let live = entries
            .get(key)
            .map(|entry| entry.expires_at.map_or(true, |at| Instant::now() < at))?;
        if live {
            entries.get(key).map(|entry| entry.value.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    fn set(&self, key: &str, value: String, ttl: Duration) {
        let expires_at = Instant::now().checked_add(ttl);
        self.lock()
            .insert(key.to_string(), Entry { value, expires_at });
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    fn clear(&self) {
        self.lock().clear();
    }
}

/// On-disk form of one [`DiskCache`] entry.
#[derive(Debug, Serialize, Deserialize)]
struct DiskEntry {
    key: String,
    /// Unix time in milliseconds; absent for entries that never expire
    expires_at_ms: Option<u64>,
    value: String,
}

/// [`ExpiringCache`] kept as one JSON file per key, so entries outlive the
/// process. Files are named by the SHA-256 of the key. I/O errors turn into
/// misses and are logged at debug level.
#[derive(Debug)]
pub struct DiskCache {
    dir: PathBuf,
    tmp_seq: AtomicU64,
}

impl DiskCache {
    /// Open (creating if needed) a cache rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            tmp_seq: AtomicU64::new(0),
        })
    }

    /// `<platform cache dir>/repodeps`, e.g. `~/.cache/repodeps` on Linux.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::cache_dir().map(|d| d.join("repodeps"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.dir.join(format!("{}.json", hex::encode(digest)))
    }

    fn write_entry(&self, path: &Path, entry: &DiskEntry) -> std::io::Result<()> {
        let json = serde_json::to_vec(entry)?;
        let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
        let tmp = path.with_extension(format!("{}-{seq}.tmp", std::process::id()));
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path).inspect_err(|_| {
            let _ = std::fs::remove_file(&tmp);
        })
    }
}

fn unix_millis_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

impl ExpiringCache for DiskCache {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.entry_path(key);
        let bytes = std::fs::read(&path).ok()?;
        let entry: DiskEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(path = %path.display(), "discarding unreadable cache entry: {e}");
                let _ = std::fs::remove_file(&path);
                return None;
            }
        };
        if entry.key != key {
            return None;
        }
        match entry.expires_at_ms {
            Some(at) if unix_millis_now() >= at => {
                let _ = std::fs::remove_file(&path);
                None
            }
            _ => Some(entry.value),
        }
    }

    fn set(&self, key: &str, value: String, ttl: Duration) {
        let expires_at_ms = u64::try_from(ttl.as_millis())
            .ok()
            .and_then(|ms| unix_millis_now().checked_add(ms));
        let entry = DiskEntry {
            key: key.to_string(),
            expires_at_ms,
            value,
        };
        if let Err(e) = self.write_entry(&self.entry_path(key), &entry) {
            tracing::debug!(key, "cache write failed: {e}");
        }
    }

    fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.entry_path(key));
    }

    fn clear(&self) {
        let Ok(entries) = std::fs::read_dir(&self.dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let _ = std::fs::remove_file(&path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_remove_clear() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set("a", "1".into(), ttl);
        cache.set("b", "2".into(), ttl);
        assert_eq!(cache.get("a").as_deref(), Some("1"));

        cache.remove("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn expired_entries_are_dropped_on_read() {
        let cache = MemoryCache::new();
        cache.set("k", "v".into(), Duration::ZERO);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn set_overwrites() {
        let cache = MemoryCache::new();
        cache.set("k", "old".into(), Duration::ZERO);
        cache.set("k", "new".into(), Duration::from_secs(60));
        assert_eq!(cache.get("k").as_deref(), Some("new"));
    }

    #[test]
    fn unrepresentable_ttl_never_expires() {
        let cache = MemoryCache::new();
        cache.set("k", "v".into(), Duration::from_secs(u64::MAX));
        assert_eq!(cache.get("k").as_deref(), Some("v"));

        let tmp = tempfile::tempdir().unwrap();
        let disk = DiskCache::open(tmp.path()).unwrap();
        disk.set("k", "v".into(), Duration::from_secs(u64::MAX));
        assert_eq!(disk.get("k").as_deref(), Some("v"));
    }

    #[test]
    fn key_contract() {
        assert_eq!(content_key("/repo@HEAD", "src/a.js"), "/repo@HEAD:src/a.js");
    }

    #[test]
    fn disk_entries_survive_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let cache = DiskCache::open(tmp.path().join("nested")).unwrap();
            cache.set("repo@abc:src/a.js", "import './b';".into(), Duration::from_secs(60));
        }
        let cache = DiskCache::open(tmp.path().join("nested")).unwrap();
        assert_eq!(
            cache.get("repo@abc:src/a.js").as_deref(),
            Some("import './b';")
        );
        assert_eq!(cache.get("repo@abc:src/b.js"), None);
    }

    #[test]
    fn disk_expired_entries_are_deleted_on_read() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DiskCache::open(tmp.path()).unwrap();
        cache.set("k", "v".into(), Duration::ZERO);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
        assert_eq!(cache.get("k"), None);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn disk_remove_clear_and_corrupt_files() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = DiskCache::open(tmp.path()).unwrap();
        let ttl = Duration::from_secs(60);
        cache.set("a", "1".into(), ttl);
        cache.set("b", "2".into(), ttl);
        std::fs::write(tmp.path().join("notes.txt"), "keep").unwrap();

        cache.remove("a");
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b").as_deref(), Some("2"));

        std::fs::write(cache.entry_path("b"), "{not json").unwrap();
        assert_eq!(cache.get("b"), None);

        cache.set("c", "3".into(), ttl);
        cache.clear();
        assert_eq!(cache.get("c"), None);
        assert!(tmp.path().join("notes.txt").exists());
    }
}
