//! Keyed query cache with stale times and prefix invalidation.
//!
//! DESIGN
//! ======
//! Keys are segment lists such as `["prompts", "all", "", "0"]`, so one
//! invalidation of `["prompts"]` marks every prompt list stale at once.
//! Invalidation keeps the old value visible and bumps a per-key generation;
//! a fetch started before the bump cannot overwrite newer data when it
//! lands.

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use std::collections::BTreeMap;

pub type QueryKey = Vec<String>;

/// Build a key from string segments.
#[cfg(test)]
pub fn query_key(parts: &[&str]) -> QueryKey {
    parts.iter().map(|p| (*p).to_owned()).collect()
}

fn has_prefix(key: &[String], prefix: &[String]) -> bool {
    key.starts_with(prefix)
}

#[derive(Clone, Debug)]
struct Entry<V> {
    value: V,
    /// `None` once invalidated.
    fetched_at: Option<i64>,
}

/// Issued by [`QueryCache::begin_fetch`]; redeemed by
/// [`QueryCache::complete_fetch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchToken {
    key: QueryKey,
    generation: u64,
}

/// Values under a prefix captured for rollback.
#[derive(Clone, Debug)]
pub struct CacheSnapshot<V> {
    prefix: QueryKey,
    entries: Vec<(QueryKey, V)>,
}

#[derive(Clone, Debug)]
pub struct QueryCache<V> {
    entries: BTreeMap<QueryKey, Entry<V>>,
    generations: BTreeMap<QueryKey, u64>,
    stale_ms: i64,
}

impl<V> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new(0)
    }
}

impl<V> QueryCache<V> {
    /// Entries younger than `stale_ms` count as fresh. Zero means every
    /// read refetches, while the cached value still renders meanwhile.
    #[must_use]
    pub fn new(stale_ms: i64) -> Self {
        Self { entries: BTreeMap::new(), generations: BTreeMap::new(), stale_ms }
    }

    pub fn get(&self, key: &[String]) -> Option<&V> {
        self.entries.get(key).map(|e| &e.value)
    }

    pub fn is_fresh(&self, key: &[String], now_ms: i64) -> bool {
        self.entries
            .get(key)
            .and_then(|e| e.fetched_at)
            .is_some_and(|at| now_ms - at < self.stale_ms)
    }

    /// Present but marked stale by an invalidation; the page showing it
    /// should refetch.
    pub fn is_invalidated(&self, key: &[String]) -> bool {
        self.entries.get(key).is_some_and(|e| e.fetched_at.is_none())
    }

    pub fn insert(&mut self, key: QueryKey, value: V, now_ms: i64) {
        self.entries.insert(key, Entry { value, fetched_at: Some(now_ms) });
    }

    pub fn remove(&mut self, key: &[String]) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Mark every entry under `prefix` stale and orphan fetches in flight for
    /// those keys. Returns how many cached entries were marked.
    pub fn invalidate_prefix(&mut self, prefix: &[String]) -> usize {
        for (key, generation) in &mut self.generations {
            if has_prefix(key, prefix) {
                *generation += 1;
            }
        }
        let mut marked = 0;
        for (key, entry) in &mut self.entries {
            if has_prefix(key, prefix) {
                entry.fetched_at = None;
                marked += 1;
            }
        }
        marked
    }

    pub fn begin_fetch(&mut self, key: QueryKey) -> FetchToken {
        let generation = *self.generations.entry(key.clone()).or_insert(0);
        FetchToken { key, generation }
    }

    /// Store a fetch result unless the key was invalidated after the fetch
    /// began. Returns whether the value was stored.
    pub fn complete_fetch(&mut self, token: FetchToken, value: V, now_ms: i64) -> bool {
        let current = self.generations.get(&token.key).copied().unwrap_or(0);
        if current != token.generation {
            log::debug!("cache: dropping stale result for {:?}", token.key);
            return false;
        }
        self.insert(token.key, value, now_ms);
        true
    }

    /// Apply `f` to every cached value under `prefix`.
    pub fn patch_prefix(&mut self, prefix: &[String], mut f: impl FnMut(&[String], &mut V)) {
        for (key, entry) in &mut self.entries {
            if has_prefix(key, prefix) {
                f(key, &mut entry.value);
            }
        }
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn snapshot_prefix(&self, prefix: &[String]) -> CacheSnapshot<V> {
        let entries = self
            .entries
            .iter()
            .filter(|(key, _)| has_prefix(key, prefix))
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect();
        CacheSnapshot { prefix: prefix.to_vec(), entries }
    }

    /// Put back the values captured by `snapshot`. Keys under the snapshot's
    /// prefix that did not exist at capture time are dropped.
    pub fn restore(&mut self, snapshot: CacheSnapshot<V>) {
        let CacheSnapshot { prefix, entries } = snapshot;
        self.entries.retain(|key, _| !has_prefix(key, &prefix));
        for (key, value) in entries {
            self.entries.insert(key, Entry { value, fetched_at: None });
        }
    }
}
