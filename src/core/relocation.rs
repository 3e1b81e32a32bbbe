/*
 * Bulk relocation of scratch files between root folders, used when the
 * configured scratches location changes. The destination is checked once up
 * front; after that every entry is moved independently, renaming on
 * conflict by prepending underscores, and failures are collected instead of
 * aborting the batch. Moved files stay moved, there is no rollback.
 *
 * The `RelocationOperations` trait exists so the app logic can be tested
 * against a mock relocator.
 */
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum RelocationError {
    /// The destination folder does not exist; nothing was moved.
    MissingDestination(PathBuf),
    /// Some entries could not be moved; the rest stay at the destination.
    Partial { failed: Vec<String> },
}

impl std::fmt::Display for RelocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelocationError::MissingDestination(path) => {
                write!(f, "Target folder does not exist: {}", path.display())
            }
            RelocationError::Partial { failed } => {
                write!(f, "Failed to move scratches: {}", failed.join(", "))
            }
        }
    }
}

impl std::error::Error for RelocationError {}

pub type Result<T> = std::result::Result<T, RelocationError>;

pub trait RelocationOperations: Send + Sync {
    fn move_scratches(&self, names: &[String], source: &Path, destination: &Path) -> Result<()>;
}

pub struct CoreRelocator {}

impl CoreRelocator {
    pub fn new() -> Self {
        CoreRelocator {}
    }

    /*
     * Picks a collision-free path for `name` under `destination` by
     * prepending `_` until no file with that leaf name exists. Bounded only
     * by the filesystem's path length limit.
     */
    fn conflict_free_destination(destination: &Path, name: &str) -> PathBuf {
        let mut candidate_name = name.to_string();
        while destination.join(&candidate_name).exists() {
            candidate_name.insert(0, '_');
        }
        destination.join(candidate_name)
    }
}

impl Default for CoreRelocator {
    fn default() -> Self {
        Self::new()
    }
}

impl RelocationOperations for CoreRelocator {
    /*
     * Moves the named entries from `source` to `destination`. Aborts before
     * touching any file when the destination folder is missing. Each entry
     * is then moved independently; names that fail are reported together in
     * `RelocationError::Partial` while successful moves are kept.
     */
    fn move_scratches(&self, names: &[String], source: &Path, destination: &Path) -> Result<()> {
        if !destination.is_dir() {
            log::warn!(
                "Relocator: Destination {destination:?} does not exist, moving nothing."
            );
            return Err(RelocationError::MissingDestination(
                destination.to_path_buf(),
            ));
        }
        log::debug!(
            "Relocator: Moving {} scratches from {source:?} to {destination:?}.",
            names.len()
        );

        let mut failed = Vec::new();
        for name in names {
            let from = source.join(name);
            let to = CoreRelocator::conflict_free_destination(destination, name);
            match fs::rename(&from, &to) {
                Ok(()) => log::trace!("Relocator: Moved {from:?} to {to:?}."),
                Err(e) => {
                    log::error!("Relocator: Failed to move {from:?} to {to:?}: {e}");
                    failed.push(name.clone());
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(RelocationError::Partial { failed })
        }
    }
}
