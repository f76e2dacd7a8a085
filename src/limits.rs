use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Injectable per-identity counter storage for quota tracking.
///
/// Keys are opaque client identities (the server uses IP addresses). A real
/// deployment can swap in a shared cache-backed implementation; the crawler
/// core never touches this.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment the counter for `key` and return the count within the
    /// current window.
    async fn increment(&self, key: &str) -> u64;

    /// Current count for `key` without incrementing.
    async fn count(&self, key: &str) -> u64;

    /// Drop any state recorded for `key`.
    async fn reset(&self, key: &str);
}

struct WindowEntry {
    window_start: Instant,
    count: u64,
}

/// Process-local counter store with a sliding window per key.
pub struct MemoryCounterStore {
    window: Duration,
    entries: Mutex<HashMap<String, WindowEntry>>,
}

impl MemoryCounterStore {
    /// Create a store whose counters reset `window` after their first hit.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
    async fn increment(&self, key: &str) -> u64 {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let entry = entries.entry(key.to_string()).or_insert(WindowEntry {
            window_start: now,
            count: 0,
        });

        if now.duration_since(entry.window_start) >= self.window {
            entry.window_start = now;
            entry.count = 0;
        }

        entry.count += 1;
        entry.count
    }

    async fn count(&self, key: &str) -> u64 {
        let entries = self.entries.lock().await;
        match entries.get(key) {
            Some(entry) if Instant::now().duration_since(entry.window_start) < self.window => {
                entry.count
            }
            _ => 0,
        }
    }

    async fn reset(&self, key: &str) {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
    }
}
