//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time (history timestamps)
//! - Storage (LocalStorage on web, memory on native)
//! - Logger setup

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::persistence::{KeyValueStore, MemoryStore};

/// Source of wall-clock time in Unix milliseconds
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// The platform's real clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0)
    }
}

/// A clock that only moves when told to (tests, replays)
#[derive(Debug, Clone, Default)]
pub struct FixedClock {
    now_ms: std::cell::Cell<f64>,
}

impl FixedClock {
    pub fn new(now_ms: f64) -> Self {
        Self {
            now_ms: std::cell::Cell::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now_ms.set(now_ms);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}

/// Default persistent store for this platform
#[cfg(target_arch = "wasm32")]
pub fn default_store() -> Box<dyn KeyValueStore> {
    match web::LocalStorageStore::open() {
        Some(store) => Box::new(store),
        None => {
            log::warn!("LocalStorage unavailable, progress will not be saved");
            Box::new(MemoryStore::new())
        }
    }
}

/// Default persistent store for this platform
#[cfg(not(target_arch = "wasm32"))]
pub fn default_store() -> Box<dyn KeyValueStore> {
    Box::new(MemoryStore::new())
}

/// Seed for round RNGs derived from the wall clock
pub fn time_seed(clock: &dyn Clock) -> u64 {
    clock.now_ms() as u64
}
