//! In-process cache backend with TTL expiry and least-recently-used eviction

use crate::{CacheBackend, CacheConfig, CacheResult, CacheStats};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry {
    data: Vec<u8>,
    expires_at: Option<Instant>,
    /// Logical clock value of the last read or write
    last_used: AtomicU64,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.map_or(false, |exp| now >= exp)
    }

    fn size(&self, key: &str) -> usize {
        key.len() + self.data.len() + std::mem::size_of::<Self>()
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: u64,
    misses: u64,
}

/// Cache backend holding entries in a concurrent map
pub struct MemoryBackend {
    entries: DashMap<String, Entry>,
    config: CacheConfig,
    clock: AtomicU64,
    operations: AtomicU64,
    /// Running total of [`Entry::size`] over every stored entry
    bytes: AtomicUsize,
    counters: Mutex<Counters>,
}

impl MemoryBackend {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config,
            clock: AtomicU64::new(0),
            operations: AtomicU64::new(0),
            bytes: AtomicUsize::new(0),
            counters: Mutex::new(Counters::default()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn memory_usage(&self) -> usize {
        self.bytes.load(Ordering::Relaxed)
    }

    fn release(&self, size: usize) {
        // Saturate so a racing flush cannot wrap the counter
        let _ = self
            .bytes
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |total| {
                Some(total.saturating_sub(size))
            });
    }

    fn remove_entry(&self, key: &str) -> bool {
        match self.entries.remove(key) {
            Some((key, entry)) => {
                self.release(entry.size(&key));
                true
            }
            None => false,
        }
    }

    fn over_limits(&self, incoming: usize) -> bool {
        if let Some(max_entries) = self.config.max_entries {
            if self.entries.len() >= max_entries {
                return true;
            }
        }

        if let Some(max_memory) = self.config.max_memory {
            if self.memory_usage() + incoming > max_memory {
                return true;
            }
        }

        false
    }

    fn remove_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|key, entry| {
            if entry.is_expired(now) {
                self.release(entry.size(key));
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    fn maybe_sweep(&self) {
        let ops = self.operations.fetch_add(1, Ordering::Relaxed) + 1;
        if ops % self.config.sweep_interval.max(1) == 0 {
            let removed = self.remove_expired();
            if removed > 0 {
                tracing::trace!(removed, "Swept expired cache entries");
            }
        }
    }

    /// Make room for one more entry of `incoming` bytes
    fn evict_for(&self, incoming: usize) {
        if !self.over_limits(incoming) {
            return;
        }

        self.remove_expired();

        while self.over_limits(incoming) {
            let victim = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().last_used.load(Ordering::Relaxed))
                .map(|entry| entry.key().clone());

            match victim {
                Some(key) => {
                    self.remove_entry(&key);
                    tracing::trace!(key = %key, "Evicted least recently used cache entry");
                }
                None => break,
            }
        }
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.maybe_sweep();
        let now = Instant::now();

        let lookup = self.entries.get(key).map(|entry| {
            if entry.is_expired(now) {
                None
            } else {
                entry.last_used.store(self.tick(), Ordering::Relaxed);
                Some(entry.data.clone())
            }
        });

        let result = match lookup {
            Some(Some(data)) => Some(data),
            Some(None) => {
                self.remove_entry(key);
                None
            }
            None => None,
        };

        let mut counters = self.counters.lock();
        if result.is_some() {
            counters.hits += 1;
        } else {
            counters.misses += 1;
        }

        Ok(result)
    }

    async fn put(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> CacheResult<()> {
        self.maybe_sweep();

        if !self.entries.contains_key(key) {
            self.evict_for(key.len() + value.len());
        }

        let entry = Entry {
            data: value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
            last_used: AtomicU64::new(self.tick()),
        };
        self.bytes.fetch_add(entry.size(key), Ordering::Relaxed);
        if let Some(previous) = self.entries.insert(key.to_string(), entry) {
            self.release(previous.size(key));
        }

        Ok(())
    }

    async fn forget(&self, key: &str) -> CacheResult<bool> {
        Ok(self.remove_entry(key))
    }

    async fn exists(&self, key: &str) -> CacheResult<bool> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(now),
            None => return Ok(false),
        };

        if expired {
            self.remove_entry(key);
        }
        Ok(!expired)
    }

    async fn flush(&self) -> CacheResult<()> {
        self.entries.clear();
        self.bytes.store(0, Ordering::Relaxed);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }

    async fn stats(&self) -> CacheResult<CacheStats> {
        let counters = self.counters.lock();
        Ok(CacheStats {
            hits: counters.hits,
            misses: counters.misses,
            total_keys: self.entries.len() as u64,
            memory_usage: self.memory_usage() as u64,
        })
    }
}
