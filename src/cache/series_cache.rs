// =============================================================================
// Series Cache: lookaside store of enriched series per request key
// =============================================================================
//
// One `Arc<EnrichedSeries>` per `SeriesKey`. Values are fully built before they
// are inserted, so a reader either sees a complete series or nothing at all.
// Two callers that miss the same key concurrently may both insert; the last
// write wins and both values are equally valid.
//
// Thread safety:
//   - parking_lot::RwLock around the map (reads dominate).
//   - Atomic counters for the statistics snapshot.
// =============================================================================

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::market_data::EnrichedSeries;
use crate::types::SeriesKey;

/// How (and whether) cached series leave the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Keep everything for the lifetime of the process.
    #[default]
    None,
    /// Entries older than `secs` are treated as absent and refetched.
    Ttl { secs: u64 },
    /// Keep at most `limit` entries; the oldest insertion goes first.
    MaxEntries { limit: usize },
}

struct CacheEntry {
    series: Arc<EnrichedSeries>,
    inserted_at: Instant,
    seq: u64,
}

/// Serialisable counters for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub policy: EvictionPolicy,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
}

pub struct SeriesCache {
    entries: RwLock<HashMap<SeriesKey, CacheEntry>>,
    policy: EvictionPolicy,
    next_seq: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
}

impl SeriesCache {
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            policy,
            next_seq: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Look up `key`. Expired entries (TTL policy) count as misses and are
    /// dropped.
    pub fn get(&self, key: &SeriesKey) -> Option<Arc<EnrichedSeries>> {
        {
            let map = self.entries.read();
            match map.get(key) {
                Some(entry) if !self.is_expired(entry) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    return Some(Arc::clone(&entry.series));
                }
                Some(_) => {}
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    return None;
                }
            }
        }

        // Expired: re-check under the write lock, another caller may have
        // replaced it in the meantime.
        let mut map = self.entries.write();
        if let Some(entry) = map.get(key) {
            if !self.is_expired(entry) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(Arc::clone(&entry.series));
            }
            map.remove(key);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(%key, "cached series expired");
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Publish a fully built series under `key`, replacing any previous value.
    pub fn insert(&self, key: SeriesKey, series: Arc<EnrichedSeries>) {
        if let EvictionPolicy::MaxEntries { limit: 0 } = self.policy {
            return;
        }

        let entry = CacheEntry {
            series,
            inserted_at: Instant::now(),
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };

        let mut map = self.entries.write();
        map.insert(key, entry);
        self.inserts.fetch_add(1, Ordering::Relaxed);

        if let EvictionPolicy::MaxEntries { limit } = self.policy {
            while map.len() > limit {
                let Some(oldest) = map
                    .iter()
                    .min_by_key(|(_, e)| e.seq)
                    .map(|(k, _)| k.clone())
                else {
                    break;
                };
                map.remove(&oldest);
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(key = %oldest, limit, "evicted oldest cached series");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            policy: self.policy,
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        match self.policy {
            EvictionPolicy::Ttl { secs } => entry.inserted_at.elapsed() >= Duration::from_secs(secs),
            _ => false,
        }
    }
}

impl std::fmt::Debug for SeriesCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeriesCache")
            .field("policy", &self.policy)
            .field("entries", &self.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
