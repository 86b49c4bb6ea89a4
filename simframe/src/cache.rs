use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use crate::error::Result;
use crate::frame::FrameId;
use crate::state::Stamp;
use crate::types::Iso3;

/// Ground transforms already computed against a state, keyed by frame.
///
/// Each frame holds at most one entry, tagged with the stamp it was
/// computed under. An entry is only ever returned for an exact stamp
/// match; a newer computation simply overwrites it. Nothing is evicted
/// otherwise, so the cache should live exactly as long as the state
/// snapshot that owns it.
///
/// Lookups take a shared lock. Transforms are computed with no lock
/// held, and the exclusive lock is only taken to store each result.
#[derive(Default)]
pub struct TransformCache {
    entries: RwLock<HashMap<FrameId, (Stamp, Iso3)>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl TransformCache {
    pub fn new() -> TransformCache {
        TransformCache::default()
    }

    /// Entry for exactly `(frame, stamp)`. Counts as a hit when found.
    pub fn get(&self, frame: FrameId, stamp: Stamp) -> Option<Iso3> {
        let found = match self.entries.read().get(&frame) {
            Some(&(entry_stamp, transform)) if entry_stamp == stamp => Some(transform),
            _ => None,
        };
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Store a freshly computed transform. Counts as a miss.
    pub fn insert(&self, frame: FrameId, stamp: Stamp, transform: Iso3) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.write();
        match entries.get(&frame) {
            // Another thread may have raced us to a newer stamp; keep theirs.
            Some(&(entry_stamp, _)) if entry_stamp > stamp => {}
            _ => {
                entries.insert(frame, (stamp, transform));
            }
        }
    }

    /// Return the entry for `(frame, stamp)`, computing and storing it
    /// on a miss. Errors from `calc` are passed through and nothing is stored.
    pub fn get_or_insert_with<F>(&self, frame: FrameId, stamp: Stamp, calc: F) -> Result<Iso3>
    where
        F: FnOnce() -> Result<Iso3>,
    {
        if let Some(transform) = self.get(frame, stamp) {
            return Ok(transform);
        }
        let transform = calc()?;
        self.insert(frame, stamp, transform);
        Ok(transform)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::Relaxed)
    }

    /// Number of times a transform actually had to be computed.
    pub fn misses(&self) -> usize {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
