//! Time-bounded cache for fact-check results, keyed by normalized query text.
//!
//! Entries are immutable snapshots; `set` replaces, never merges. Expiry is lazy:
//! a stale entry is dropped by the `get` that finds it.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::analyze::fact_check::FactCheckResult;
use crate::clock::Clock;

/// Default freshness window (30 minutes).
pub const DEFAULT_TTL_SECS: i64 = 30 * 60;

pub trait FactCheckCache: Send + Sync {
    fn get(&self, key: &str) -> Option<FactCheckResult>;
    fn set(&self, key: &str, value: FactCheckResult);
    fn expire(&self, key: &str);
}

#[derive(Debug, Clone)]
struct Entry {
    stored_at: DateTime<Utc>,
    value: FactCheckResult,
}

pub struct InMemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl InMemoryCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_fresh(&self, e: &Entry, now: DateTime<Utc>) -> bool {
        now - e.stored_at < self.ttl
    }
}

impl FactCheckCache for InMemoryCache {
    fn get(&self, key: &str) -> Option<FactCheckResult> {
        let now = self.clock.now();
        {
            let guard = self.entries.read().expect("cache lock poisoned");
            match guard.get(key) {
                None => return None,
                Some(e) if self.is_fresh(e, now) => return Some(e.value.clone()),
                Some(_) => {}
            }
        }

        // Stale: re-check under the write lock, a concurrent `set` may have refreshed it.
        let mut guard = self.entries.write().expect("cache lock poisoned");
        if let Some(e) = guard.get(key) {
            if self.is_fresh(e, now) {
                return Some(e.value.clone());
            }
            guard.remove(key);
        }
        None
    }

    fn set(&self, key: &str, value: FactCheckResult) {
        let entry = Entry {
            stored_at: self.clock.now(),
            value,
        };
        self.entries
            .write()
            .expect("cache lock poisoned")
            .insert(key.to_string(), entry);
    }

    fn expire(&self, key: &str) {
        self.entries
            .write()
            .expect("cache lock poisoned")
            .remove(key);
    }
}

/// Cache key: lower-case, whitespace collapsed, trimmed.
pub fn normalize_key(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    let mut last_space = false;
    for ch in query.chars() {
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            last_space = false;
        }
    }
    out.trim().to_string()
}
