//! Thread-Safe Storage Engine with Expiry Support
//!
//! This module implements the store behind every command: a concurrent
//! `HashMap` from key to [`Entry`], where each entry may carry an absolute
//! expiry deadline.
//!
//! ## Design Decisions
//!
//! 1. **Single RwLock**: Readers (`get`) run concurrently; writers (`set`,
//!    `set_with_ttl`, `delete`) and the background sweep are exclusive.
//!    No operation ever holds more than one lock, so deadlock is impossible.
//! 2. **Lazy Expiry**: `get` treats an entry whose deadline has passed as
//!    absent, whether or not the sweeper has removed it yet.
//! 3. **Active Expiry**: [`StorageEngine::cleanup_expired`] physically removes
//!    expired entries. It is driven by the [`ExpirySweeper`](super::ExpirySweeper).
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                StorageEngine                 │
//! │   ┌──────────────────────────────────────┐   │
//! │   │  RwLock<HashMap<String, Entry>>      │   │
//! │   └──────────────────────────────────────┘   │
//! │     ▲ read: GET          ▲ write: SET, DEL,  │
//! │     │ (shared)           │ sweep (exclusive) │
//! └─────┴────────────────────┴───────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

/// Represents a stored value with optional expiry time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// The actual value stored
    pub value: String,
    /// When this entry expires (None = never expires)
    pub expires_at: Option<Instant>,
}

impl Entry {
    /// Creates a new entry without expiry.
    pub fn new(value: String) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// Creates a new entry that expires `ttl_seconds` from now.
    ///
    /// Zero and negative TTLs are accepted literally and produce an entry
    /// that is already expired. A deadline too far in the future to be
    /// represented never expires.
    pub fn with_ttl(value: String, ttl_seconds: i64) -> Self {
        let now = Instant::now();
        let offset = Duration::from_secs(ttl_seconds.unsigned_abs());

        let expires_at = if ttl_seconds > 0 {
            now.checked_add(offset)
        } else {
            Some(now.checked_sub(offset).unwrap_or(now))
        };

        Self { value, expires_at }
    }

    /// Checks if this entry has expired as of `now`.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.map(|exp| now >= exp).unwrap_or(false)
    }

    /// Checks if this entry has expired.
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}

/// The operations command handlers need from a store.
///
/// [`StorageEngine`] is the production implementation; tests substitute
/// their own to observe what a command does to the store.
pub trait KeyValueStore: Send + Sync {
    /// Inserts or overwrites `key`, clearing any previous expiry.
    fn set(&self, key: String, value: String);

    /// Inserts or overwrites `key` with a deadline `ttl_seconds` from now.
    fn set_with_ttl(&self, key: String, value: String, ttl_seconds: i64);

    /// Returns the live value for `key`, or `None` if absent or expired.
    fn get(&self, key: &str) -> Option<String>;

    /// Removes `key` regardless of expiry, reporting whether it was present.
    fn delete(&self, key: &str) -> bool;
}

/// A point-in-time snapshot of storage counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of entries physically resident (including expired, unswept ones)
    pub keys: u64,
    /// Total GET operations
    pub get_ops: u64,
    /// Total SET and SET_WITH_TTL operations
    pub set_ops: u64,
    /// Total DELETE operations
    pub del_ops: u64,
    /// Total expired entries removed by the sweeper
    pub expired: u64,
}

/// The in-memory store shared by every connection.
///
/// # Thread Safety
///
/// This struct is designed to be wrapped in an `Arc` and shared across
/// all client handler tasks. All operations are thread-safe and each one
/// is atomic with respect to the others.
///
/// # Example
///
/// ```
/// use linekv::storage::{KeyValueStore, StorageEngine};
///
/// let engine = StorageEngine::new();
///
/// engine.set("name".to_string(), "alice".to_string());
/// assert_eq!(engine.get("name"), Some("alice".to_string()));
///
/// // A zero TTL is already expired
/// engine.set_with_ttl("session".to_string(), "abc123".to_string(), 0);
/// assert_eq!(engine.get("session"), None);
/// ```
pub struct StorageEngine {
    data: RwLock<HashMap<String, Entry>>,

    get_count: AtomicU64,
    set_count: AtomicU64,
    del_count: AtomicU64,
    expired_count: AtomicU64,
}

impl std::fmt::Debug for StorageEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageEngine")
            .field("keys", &self.len())
            .field("get_count", &self.get_count.load(Ordering::Relaxed))
            .field("set_count", &self.set_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl Default for StorageEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageEngine {
    /// Creates a new, empty storage engine.
    pub fn new() -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            get_count: AtomicU64::new(0),
            set_count: AtomicU64::new(0),
            del_count: AtomicU64::new(0),
            expired_count: AtomicU64::new(0),
        }
    }

    // Every mutation is a single map operation, so a guard recovered from a
    // poisoned lock still sees a consistent map.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Entry>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Entry>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets a key-value pair without expiry.
    ///
    /// If the key already exists, its value is overwritten and any previous
    /// expiry is cleared.
    pub fn set(&self, key: String, value: String) {
        self.set_count.fetch_add(1, Ordering::Relaxed);
        self.write().insert(key, Entry::new(value));
    }

    /// Sets a key-value pair that expires `ttl_seconds` from now.
    pub fn set_with_ttl(&self, key: String, value: String, ttl_seconds: i64) {
        self.set_count.fetch_add(1, Ordering::Relaxed);
        self.write().insert(key, Entry::with_ttl(value, ttl_seconds));
    }

    /// Gets the value for a key.
    ///
    /// Returns `None` if the key doesn't exist or its deadline has passed.
    /// Only a shared lock is taken; expired entries are left for the sweeper.
    pub fn get(&self, key: &str) -> Option<String> {
        self.get_count.fetch_add(1, Ordering::Relaxed);

        let data = self.read();
        data.get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone())
    }

    /// Deletes a key, whether or not it has expired.
    ///
    /// # Returns
    ///
    /// Returns `true` if the key was present before removal.
    pub fn delete(&self, key: &str) -> bool {
        self.del_count.fetch_add(1, Ordering::Relaxed);
        self.write().remove(key).is_some()
    }

    /// Returns the number of physically resident entries.
    pub fn len(&self) -> u64 {
        self.read().len() as u64
    }

    /// Returns true if no entries are resident.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns a snapshot of the storage counters.
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            keys: self.len(),
            get_ops: self.get_count.load(Ordering::Relaxed),
            set_ops: self.set_count.load(Ordering::Relaxed),
            del_ops: self.del_count.load(Ordering::Relaxed),
            expired: self.expired_count.load(Ordering::Relaxed),
        }
    }

    /// Removes every entry whose deadline has passed.
    ///
    /// The whole scan runs under the write lock, so no reader ever observes
    /// a half-swept map.
    ///
    /// # Returns
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> u64 {
        let now = Instant::now();

        let mut data = self.write();
        let before = data.len();
        data.retain(|_, entry| !entry.is_expired_at(now));
        let cleaned = (before - data.len()) as u64;
        drop(data);

        if cleaned > 0 {
            self.expired_count.fetch_add(cleaned, Ordering::Relaxed);
        }

        cleaned
    }
}

impl KeyValueStore for StorageEngine {
    fn set(&self, key: String, value: String) {
        StorageEngine::set(self, key, value)
    }

    fn set_with_ttl(&self, key: String, value: String, ttl_seconds: i64) {
        StorageEngine::set_with_ttl(self, key, value, ttl_seconds)
    }

    fn get(&self, key: &str) -> Option<String> {
        StorageEngine::get(self, key)
    }

    fn delete(&self, key: &str) -> bool {
        StorageEngine::delete(self, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_set_and_get() {
        let engine = StorageEngine::new();

        engine.set("key".to_string(), "value".to_string());
        assert_eq!(engine.get("key"), Some("value".to_string()));
    }

    #[test]
    fn test_get_nonexistent() {
        let engine = StorageEngine::new();
        assert_eq!(engine.get("nonexistent"), None);
    }

    #[test]
    fn test_overwrite_clears_expiry() {
        let engine = StorageEngine::new();

        engine.set_with_ttl("key".to_string(), "old".to_string(), 0);
        assert_eq!(engine.get("key"), None);

        engine.set("key".to_string(), "new".to_string());
        assert_eq!(engine.get("key"), Some("new".to_string()));
        assert_eq!(engine.cleanup_expired(), 0);
    }

    #[test]
    fn test_delete() {
        let engine = StorageEngine::new();

        engine.set("key".to_string(), "value".to_string());
        assert!(engine.delete("key"));
        assert_eq!(engine.get("key"), None);
        assert!(!engine.delete("key")); // Already deleted
    }

    #[test]
    fn test_delete_expired_entry_reports_presence() {
        let engine = StorageEngine::new();

        engine.set_with_ttl("key".to_string(), "value".to_string(), -5);
        assert_eq!(engine.get("key"), None);
        // Still physically resident, so delete sees it
        assert!(engine.delete("key"));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_zero_and_negative_ttl_expire_immediately() {
        let engine = StorageEngine::new();

        engine.set_with_ttl("zero".to_string(), "v".to_string(), 0);
        engine.set_with_ttl("negative".to_string(), "v".to_string(), -100);

        assert_eq!(engine.get("zero"), None);
        assert_eq!(engine.get("negative"), None);
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_positive_ttl_is_live() {
        let engine = StorageEngine::new();

        engine.set_with_ttl("key".to_string(), "value".to_string(), 100);
        assert_eq!(engine.get("key"), Some("value".to_string()));
    }

    #[test]
    fn test_huge_ttl_never_expires() {
        let entry = Entry::with_ttl("v".to_string(), i64::MAX);
        assert!(!entry.is_expired());

        let entry = Entry::with_ttl("v".to_string(), i64::MIN);
        assert!(entry.is_expired());
    }

    #[test]
    fn test_cleanup_expired() {
        let engine = StorageEngine::new();

        engine.set_with_ttl("key1".to_string(), "value1".to_string(), 0);
        engine.set_with_ttl("key2".to_string(), "value2".to_string(), -1);
        engine.set_with_ttl("key3".to_string(), "value3".to_string(), 3600);
        engine.set("key4".to_string(), "value4".to_string()); // No expiry

        let cleaned = engine.cleanup_expired();
        assert_eq!(cleaned, 2);
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.get("key3"), Some("value3".to_string()));
        assert_eq!(engine.get("key4"), Some("value4".to_string()));
        assert_eq!(engine.stats().expired, 2);
    }

    #[test]
    fn test_stats() {
        let engine = StorageEngine::new();

        engine.set("a".to_string(), "1".to_string());
        engine.set_with_ttl("b".to_string(), "2".to_string(), 10);
        engine.get("a");
        engine.delete("a");

        assert_eq!(
            engine.stats(),
            StorageStats {
                keys: 1,
                get_ops: 1,
                set_ops: 2,
                del_ops: 1,
                expired: 0,
            }
        );
    }

    #[test]
    fn test_concurrent_access() {
        let engine = Arc::new(StorageEngine::new());
        let mut handles = vec![];

        // Spawn multiple writers
        for i in 0..10 {
            let engine = Arc::clone(&engine);
            handles.push(thread::spawn(move || {
                for j in 0..100 {
                    let key = format!("key-{}-{}", i, j);
                    engine.set(key.clone(), "value".to_string());
                    assert_eq!(engine.get(&key), Some("value".to_string()));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(engine.len(), 1000);
    }

    #[test]
    fn test_concurrent_readers_never_see_torn_values() {
        let engine = Arc::new(StorageEngine::new());
        let keys: Vec<String> = (0..8).map(|i| format!("key-{}", i)).collect();
        let old = "a".repeat(256);
        let new = "b".repeat(256);

        for key in &keys {
            engine.set(key.clone(), old.clone());
        }

        let mut handles = vec![];

        for key in keys.clone() {
            let engine = Arc::clone(&engine);
            let (old, new) = (old.clone(), new.clone());
            handles.push(thread::spawn(move || {
                for round in 0..500 {
                    let value = if round % 2 == 0 { &new } else { &old };
                    engine.set(key.clone(), value.clone());
                }
            }));
        }

        for _ in 0..4 {
            let engine = Arc::clone(&engine);
            let keys = keys.clone();
            let (old, new) = (old.clone(), new.clone());
            handles.push(thread::spawn(move || {
                for _ in 0..500 {
                    for key in &keys {
                        let value = engine.get(key).expect("key is never deleted");
                        assert!(value == old || value == new);
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
