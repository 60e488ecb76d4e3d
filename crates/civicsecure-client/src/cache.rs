//! Time-bounded cache over a [`LocalStore`].
//!
//! Values are wrapped in a `{data, timestamp}` envelope, the timestamp in
//! RFC 3339. A read is valid only
//! while `now - timestamp < ttl`; expired or unreadable entries are removed on
//! read and reported as absent.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::local_store::LocalStore;

/// Source of the current time for cache freshness checks.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(start)))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    data: &'a T,
    timestamp: DateTime<Utc>,
}

#[derive(Deserialize)]
struct EnvelopeIn<T> {
    data: T,
    timestamp: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TtlCache<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: LocalStore> TtlCache<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: LocalStore, C: Clock> TtlCache<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Read `key` if it was written less than `ttl` ago.
    pub fn get<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Cache read failed");
                return None;
            }
        };

        let envelope: EnvelopeIn<T> = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable cache entry");
                self.evict(key);
                return None;
            }
        };

        let age = self.clock.now() - envelope.timestamp;
        if age < ttl {
            Some(envelope.data)
        } else {
            tracing::debug!(key, age_secs = age.num_seconds(), "Cache entry expired");
            self.evict(key);
            None
        }
    }

    /// Write `value` under `key`, stamped with the current time.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let envelope = EnvelopeOut {
            data: value,
            timestamp: self.clock.now(),
        };
        let raw = serde_json::to_string(&envelope)?;
        self.store.set(key, &raw)
    }

    pub fn clear(&self, key: &str) -> Result<bool> {
        self.store.remove(key)
    }

    fn evict(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            tracing::warn!(key, error = %e, "Failed to evict cache entry");
        }
    }
}
