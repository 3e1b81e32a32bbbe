/*
 * Holds the process-wide current `ScratchConfig`. Collaborators receive a
 * reference to the cell instead of reaching for ambient global state:
 * readers take cheap `Arc` snapshots, writers apply a pure transformation
 * and atomically swap the replacement in. Readers therefore never observe
 * a half-updated collection.
 */
use super::scratch_config::ScratchConfig;
use std::sync::{Arc, RwLock};

pub struct ConfigCell {
    current: RwLock<Arc<ScratchConfig>>,
}

impl ConfigCell {
    pub fn new(config: ScratchConfig) -> Self {
        ConfigCell {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// The current value. The snapshot stays valid after later updates.
    pub fn snapshot(&self) -> Arc<ScratchConfig> {
        // The payload is replaced wholesale and never edited in place, so a
        // poisoned lock still guards a complete value; recover the guard.
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /*
     * Applies `transform` to the current value and swaps the result in,
     * returning the new snapshot. The write lock spans the whole
     * read-transform-write sequence, so concurrent updates cannot
     * interleave and lose each other's changes.
     */
    pub fn update<F>(&self, transform: F) -> Arc<ScratchConfig>
    where
        F: FnOnce(&ScratchConfig) -> ScratchConfig,
    {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let next = Arc::new(transform(&guard));
        *guard = Arc::clone(&next);
        next
    }
}

impl Default for ConfigCell {
    fn default() -> Self {
        ConfigCell::new(ScratchConfig::default())
    }
}
