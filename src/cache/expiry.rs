//! Expiration Index Module
//!
//! Maps each stored key to the instant at which it stops being served.

use std::collections::HashMap;
use std::time::{Duration, Instant};

// == Expiration Index ==
/// Key to deadline mapping, kept in lockstep with the entry table.
#[derive(Debug, Default)]
pub struct ExpirationIndex {
    deadlines: HashMap<String, Instant>,
}

impl ExpirationIndex {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            deadlines: HashMap::with_capacity(capacity),
        }
    }

    /// Sets or replaces the deadline for `key`.
    pub fn insert(&mut self, key: &str, deadline: Instant) {
        match self.deadlines.get_mut(key) {
            Some(existing) => *existing = deadline,
            None => {
                self.deadlines.insert(key.to_string(), deadline);
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<Instant> {
        self.deadlines.remove(key)
    }

    // == Is Expired ==
    /// Checks whether `key` has expired at `now`.
    ///
    /// Boundary: an entry is expired once `now >= deadline`, so the full TTL
    /// is the last instant it is *not* served. Unknown keys are not expired.
    pub fn is_expired(&self, key: &str, now: Instant) -> bool {
        self.deadlines
            .get(key)
            .is_some_and(|deadline| now >= *deadline)
    }

    /// Collects every key whose deadline is at or before `now`.
    pub fn expired_keys(&self, now: Instant) -> Vec<String> {
        self.deadlines
            .iter()
            .filter(|(_, deadline)| now >= **deadline)
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.deadlines.keys().map(String::as_str)
    }
}

// == Deadline ==
/// Returns `now + ttl`, shortening `ttl` until the sum is representable.
///
/// Keeps writes total for TTLs too large for the platform's `Instant`.
pub fn deadline_after(now: Instant, ttl: Duration) -> Instant {
    let mut ttl = ttl;
    loop {
        if let Some(deadline) = now.checked_add(ttl) {
            return deadline;
        }
        ttl /= 2;
    }
}
