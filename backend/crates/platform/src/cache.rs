//! Single-flight TTL cache
//!
//! Keys map to the last successfully fetched value plus the time it was
//! stored. At most one fetch per key is in flight; every concurrent reader of
//! that key awaits the same shared future. Fetches run on their own task, so a
//! reader giving up (deadline, disconnect) never cancels the refresh.
//!
//! Read rules:
//! - younger than ttl: served as is
//! - older than ttl but within the grace window: served immediately while one
//!   refresh runs in the background; if the previous background refresh
//!   failed, its error rides along until a refresh succeeds
//! - older than that, or absent: the caller waits for the refresh; if it fails
//!   and an old value exists, the old value is served with the error attached

use crate::client::FetchError;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

type SharedFetch<V> = Shared<BoxFuture<'static, Result<Arc<V>, FetchError>>>;

/// How a [`Lookup`] was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Within ttl, no fetch needed
    Fresh,
    /// Fetched during this call
    Refreshed,
    /// Past ttl, served while a refresh runs (or from `peek`)
    Stale,
    /// Refresh failed, previous value served
    StaleOnError,
}

/// Result of a cache read
#[derive(Debug, Clone)]
pub struct Lookup<V> {
    pub value: Arc<V>,
    pub age: Duration,
    pub freshness: Freshness,
    /// Set when the latest refresh failed and the value is a leftover
    pub error: Option<FetchError>,
}

impl<V> Lookup<V> {
    fn new(value: Arc<V>, age: Duration, freshness: Freshness) -> Self {
        Self {
            value,
            age,
            freshness,
            error: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Counters and key totals, exposed on the health endpoint
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub total_keys: usize,
    pub expired: usize,
    pub active: usize,
    pub in_flight: usize,
    pub hits: u64,
    pub misses: u64,
    pub stale_served: u64,
    pub fetches: u64,
    pub fetch_errors: u64,
    pub unchanged: u64,
    pub discarded: u64,
}

impl std::ops::AddAssign for CacheStats {
    fn add_assign(&mut self, other: Self) {
        self.total_keys += other.total_keys;
        self.expired += other.expired;
        self.active += other.active;
        self.in_flight += other.in_flight;
        self.hits += other.hits;
        self.misses += other.misses;
        self.stale_served += other.stale_served;
        self.fetches += other.fetches;
        self.fetch_errors += other.fetch_errors;
        self.unchanged += other.unchanged;
        self.discarded += other.discarded;
    }
}

impl std::iter::Sum for CacheStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut total, stats| {
            total += stats;
            total
        })
    }
}

struct Entry<V> {
    value: Arc<V>,
    stored_at: Instant,
    /// When the fetch that produced this value was started
    requested_at: Instant,
    ttl: Duration,
}

struct Slot<V> {
    entry: Option<Entry<V>>,
    in_flight: Option<(u64, SharedFetch<V>)>,
    /// Error of the most recent fetch, cleared by the next success
    last_error: Option<FetchError>,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self {
            entry: None,
            in_flight: None,
            last_error: None,
        }
    }
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    stale_served: AtomicU64,
    fetches: AtomicU64,
    fetch_errors: AtomicU64,
    unchanged: AtomicU64,
    discarded: AtomicU64,
}

struct Inner<V> {
    name: &'static str,
    grace: Duration,
    slots: Mutex<HashMap<String, Slot<V>>>,
    next_fetch_id: AtomicU64,
    counters: Counters,
}

/// Keyed TTL store with single-flight refresh
pub struct TtlCache<V> {
    inner: Arc<Inner<V>>,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> TtlCache<V>
where
    V: PartialEq + Send + Sync + 'static,
{
    /// `name` only shows up in logs; `grace` is how long past its ttl a value
    /// may still be served without waiting.
    pub fn new(name: &'static str, grace: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                name,
                grace,
                slots: Mutex::new(HashMap::new()),
                next_fetch_id: AtomicU64::new(1),
                counters: Counters::default(),
            }),
        }
    }

    /// Return the cached value for `key`, fetching it with `fetch` when it is
    /// missing or stale.
    ///
    /// `fetch` is only called when this caller is the one starting the
    /// refresh, and it is called under the store lock: it must build the
    /// future and return, not do work.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<Lookup<V>, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let now = Instant::now();
        let counters = &self.inner.counters;

        let (pending, previous, last_error) = {
            let mut slots = self.inner.slots.lock();
            let slot = slots.entry(key.to_string()).or_default();

            if let Some(entry) = &slot.entry {
                let age = now.duration_since(entry.stored_at);
                if age < entry.ttl {
                    counters.hits.fetch_add(1, Ordering::Relaxed);
                    tracing::trace!(cache = self.inner.name, key, "Cache hit");
                    return Ok(Lookup::new(entry.value.clone(), age, Freshness::Fresh));
                }
            }

            counters.misses.fetch_add(1, Ordering::Relaxed);
            let pending = match &slot.in_flight {
                Some((_, shared)) => shared.clone(),
                None => {
                    let (id, shared) = self.start_fetch(key, ttl, now, fetch());
                    slot.in_flight = Some((id, shared.clone()));
                    shared
                }
            };

            let previous = slot
                .entry
                .as_ref()
                .map(|e| (e.value.clone(), now.duration_since(e.stored_at), e.ttl));
            (pending, previous, slot.last_error.clone())
        };

        if let Some((value, age, ttl)) = &previous {
            if *age < *ttl + self.inner.grace {
                counters.stale_served.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    cache = self.inner.name,
                    key,
                    age_ms = age.as_millis() as u64,
                    failing = last_error.is_some(),
                    "Serving stale value while revalidating"
                );
                return Ok(Lookup {
                    value: value.clone(),
                    age: *age,
                    freshness: Freshness::Stale,
                    error: last_error,
                });
            }
        }

        match pending.await {
            Ok(value) => Ok(Lookup::new(value, Duration::ZERO, Freshness::Refreshed)),
            Err(err) => match previous {
                Some((value, age, _)) => {
                    counters.stale_served.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        cache = self.inner.name,
                        key,
                        age_ms = age.as_millis() as u64,
                        error = %err,
                        "Refresh failed, serving stale value"
                    );
                    Ok(Lookup {
                        value,
                        age,
                        freshness: Freshness::StaleOnError,
                        error: Some(err),
                    })
                }
                None => Err(err),
            },
        }
    }

    /// Current value for `key` without triggering a fetch.
    pub fn peek(&self, key: &str) -> Option<Lookup<V>> {
        let now = Instant::now();
        let slots = self.inner.slots.lock();
        let slot = slots.get(key)?;
        let entry = slot.entry.as_ref()?;
        let age = now.duration_since(entry.stored_at);
        let freshness = if age < entry.ttl {
            Freshness::Fresh
        } else {
            Freshness::Stale
        };
        Some(Lookup {
            value: entry.value.clone(),
            age,
            freshness,
            error: slot.last_error.clone(),
        })
    }

    /// Drop every key starting with `prefix` (all keys when `None`).
    ///
    /// Fetches already in flight for dropped keys still complete for their
    /// waiters but their results are not stored.
    pub fn clear(&self, prefix: Option<&str>) -> usize {
        let mut slots = self.inner.slots.lock();
        let before = slots.len();
        match prefix {
            Some(prefix) => slots.retain(|key, _| !key.starts_with(prefix)),
            None => slots.clear(),
        }
        let removed = before - slots.len();
        if removed > 0 {
            tracing::debug!(
                cache = self.inner.name,
                prefix = prefix.unwrap_or("*"),
                removed,
                "Cache keys cleared"
            );
        }
        removed
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let slots = self.inner.slots.lock();
        let entries = slots.values().filter_map(|slot| slot.entry.as_ref());
        let (mut total_keys, mut expired) = (0, 0);
        for entry in entries {
            total_keys += 1;
            if now.duration_since(entry.stored_at) >= entry.ttl {
                expired += 1;
            }
        }
        let counters = &self.inner.counters;
        CacheStats {
            total_keys,
            expired,
            active: total_keys - expired,
            in_flight: slots.values().filter(|s| s.in_flight.is_some()).count(),
            hits: counters.hits.load(Ordering::Relaxed),
            misses: counters.misses.load(Ordering::Relaxed),
            stale_served: counters.stale_served.load(Ordering::Relaxed),
            fetches: counters.fetches.load(Ordering::Relaxed),
            fetch_errors: counters.fetch_errors.load(Ordering::Relaxed),
            unchanged: counters.unchanged.load(Ordering::Relaxed),
            discarded: counters.discarded.load(Ordering::Relaxed),
        }
    }

    fn start_fetch<Fut>(
        &self,
        key: &str,
        ttl: Duration,
        requested_at: Instant,
        fut: Fut,
    ) -> (u64, SharedFetch<V>)
    where
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
        self.inner.counters.fetches.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(cache = self.inner.name, key, "Cache miss, fetching");

        let inner = Arc::clone(&self.inner);
        let key = key.to_string();
        let shared = async move {
            let result = fut.await.map(Arc::new);
            inner.complete(&key, id, ttl, requested_at, result)
        }
        .boxed()
        .shared();

        // Drive the fetch to completion even if every waiter goes away.
        tokio::spawn(shared.clone());
        (id, shared)
    }
}

impl<V> Inner<V>
where
    V: PartialEq,
{
    fn complete(
        &self,
        key: &str,
        fetch_id: u64,
        ttl: Duration,
        requested_at: Instant,
        result: Result<Arc<V>, FetchError>,
    ) -> Result<Arc<V>, FetchError> {
        let mut slots = self.slots.lock();
        let Some(slot) = slots.get_mut(key) else {
            // Cleared while fetching.
            return result;
        };

        if slot.in_flight.as_ref().is_some_and(|(id, _)| *id == fetch_id) {
            slot.in_flight = None;
        }

        let value = match result {
            Ok(value) => value,
            Err(err) => {
                self.counters.fetch_errors.fetch_add(1, Ordering::Relaxed);
                slot.last_error = Some(err.clone());
                return Err(err);
            }
        };
        slot.last_error = None;

        let now = Instant::now();
        if let Some(existing) = slot.entry.as_mut() {
            if existing.requested_at > requested_at {
                self.counters.discarded.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(cache = self.name, key, "Discarding out-of-order fetch result");
                return Ok(value);
            }
            if *existing.value == *value {
                self.counters.unchanged.fetch_add(1, Ordering::Relaxed);
                existing.stored_at = now;
                existing.requested_at = requested_at;
                existing.ttl = ttl;
                return Ok(existing.value.clone());
            }
        }

        slot.entry = Some(Entry {
            value: value.clone(),
            stored_at: now,
            requested_at,
            ttl,
        });
        Ok(value)
    }
}
