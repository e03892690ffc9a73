// Expiring key/value cache for computed results. Values are stored as JSON so
// any serializable payload can be cached.
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::error::EngineError;

pub trait PredictionCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, EngineError>;
    fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), EngineError>;
    /// Drops expired entries; returns how many were removed.
    fn purge_expired(&self) -> Result<usize, EngineError>;
}

struct Entry {
    value: Value,
    expires_at: Instant,
}

#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Entry>>, EngineError> {
        self.entries
            .lock()
            .map_err(|e| EngineError::CacheError(format!("Cache lock poisoned: {}", e)))
    }
}

impl PredictionCache for InMemoryCache {
    fn get(&self, key: &str) -> Result<Option<Value>, EngineError> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        if entries.get(key).is_some_and(|entry| entry.expires_at <= now) {
            entries.remove(key);
        }
        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), EngineError> {
        let expires_at = Instant::now() + ttl;
        self.lock()?.insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    fn purge_expired(&self) -> Result<usize, EngineError> {
        let mut entries = self.lock()?;
        let before = entries.len();
        let now = Instant::now();
        entries.retain(|_, entry| entry.expires_at > now);
        Ok(before - entries.len())
    }
}
