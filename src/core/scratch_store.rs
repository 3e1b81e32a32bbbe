/*
 * This module realizes scratch entries as regular files under a root folder.
 * It owns the root path, lists and checks the valid-scratch children (plain,
 * non-hidden files directly under the root), validates proposed names
 * against filesystem rules, and performs the create/remove/rename
 * mutations.
 *
 * Mutations never raise I/O errors past this boundary: each failure is
 * logged here and reported to the caller as `false`. A trait
 * (`ScratchStoreOperations`) abstracts the store so the app logic can be
 * tested against mock implementations.
 */
use super::validation::NameRejection;
use ignore::WalkBuilder;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

// Conservative superset of characters rejected by common filesystems.
const INVALID_NAME_CHARS: [char; 9] = ['/', '\\', '*', '?', '<', '>', ':', '"', '|'];

pub trait ScratchStoreOperations: Send + Sync {
    fn root_path(&self) -> PathBuf;
    fn set_root_path(&self, root: &Path);
    fn scratch_path(&self, name: &str) -> PathBuf;
    fn list(&self) -> Vec<String>;
    fn exists(&self, name: &str) -> bool;
    fn is_valid_name(&self, name: &str) -> Result<(), NameRejection>;
    fn create(&self, name: &str, content: &str) -> bool;
    fn remove(&self, name: &str) -> bool;
    fn rename(&self, name: &str, new_name: &str) -> bool;
    fn is_member(&self, path: &Path) -> bool;
}

pub struct CoreScratchStore {
    root: RwLock<PathBuf>,
    // Serializes create/remove/rename against each other; reads stay
    // lock-free snapshots of the directory.
    mutation_lock: Mutex<()>,
}

impl CoreScratchStore {
    pub fn new(root: PathBuf) -> Self {
        log::debug!("ScratchStore: Created for root {root:?}");
        CoreScratchStore {
            root: RwLock::new(root),
            mutation_lock: Mutex::new(()),
        }
    }

    fn is_hidden_name(name: &str) -> bool {
        name.starts_with('.')
    }
}

impl ScratchStoreOperations for CoreScratchStore {
    fn root_path(&self) -> PathBuf {
        // A poisoned lock still guards a complete path; recover the guard.
        self.root.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn set_root_path(&self, root: &Path) {
        log::debug!("ScratchStore: Rebinding root to {root:?}");
        *self.root.write().unwrap_or_else(|e| e.into_inner()) = root.to_path_buf();
    }

    fn scratch_path(&self, name: &str) -> PathBuf {
        self.root_path().join(name)
    }

    /*
     * Lists the names of all valid-scratch children of the root, in
     * filesystem enumeration order. Hidden files and subdirectories are
     * never listed; a missing root lists as empty. Display order is the
     * collection's concern, so no sorting happens here.
     */
    fn list(&self) -> Vec<String> {
        let root = self.root_path();
        if !root.is_dir() {
            log::trace!("ScratchStore: Root {root:?} does not exist, listing nothing.");
            return Vec::new();
        }

        let mut names = Vec::new();
        let walker = WalkBuilder::new(&root)
            .max_depth(Some(1))
            .standard_filters(false) // No gitignore handling inside the scratches folder.
            .hidden(true) // Dot-prefixed files are not scratches.
            .build();
        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("ScratchStore: Skipping unreadable entry under {root:?}: {e}");
                    continue;
                }
            };
            if entry.path() == root {
                continue;
            }
            if entry.file_type().is_some_and(|ft| ft.is_file()) {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        log::trace!("ScratchStore: Listed {} scratches under {root:?}.", names.len());
        names
    }

    fn exists(&self, name: &str) -> bool {
        !Self::is_hidden_name(name) && self.scratch_path(name).is_file()
    }

    /*
     * Checks a proposed name against filesystem rules: rejects empty or
     * all-whitespace names, separators and wildcards, hidden names, the
     * conservative reserved character set, and collisions with anything
     * already on disk at `root/name` (a directory or hidden file counts
     * as a collision too). Domain-level duplicate checks are layered on
     * top by `validation::validate_new_name`.
     */
    fn is_valid_name(&self, name: &str) -> Result<(), NameRejection> {
        if name.trim().is_empty()
            || Self::is_hidden_name(name)
            || name
                .chars()
                .any(|c| INVALID_NAME_CHARS.contains(&c) || c.is_control())
        {
            return Err(NameRejection::InvalidFileName(name.to_string()));
        }
        if self.scratch_path(name).exists() {
            return Err(NameRejection::AlreadyExists(name.to_string()));
        }
        Ok(())
    }

    /*
     * Creates a new scratch file and writes `content` as UTF-8, creating
     * the root folder and all missing parents first. Refuses to overwrite:
     * a pre-existing file with that name is an error. Returns false on any
     * I/O failure, logged here.
     */
    fn create(&self, name: &str, content: &str) -> bool {
        let _guard = self.mutation_lock.lock().unwrap_or_else(|e| e.into_inner());

        let root = self.root_path();
        if let Err(e) = fs::create_dir_all(&root) {
            log::error!("ScratchStore: Failed to create scratches root {root:?}: {e}");
            return false;
        }

        let path = root.join(name);
        let written = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .and_then(|mut file| file.write_all(content.as_bytes()));
        match written {
            Ok(()) => {
                log::debug!("ScratchStore: Created scratch file {path:?}.");
                true
            }
            Err(e) => {
                log::error!("ScratchStore: Failed to create scratch file {path:?}: {e}");
                false
            }
        }
    }

    fn remove(&self, name: &str) -> bool {
        let _guard = self.mutation_lock.lock().unwrap_or_else(|e| e.into_inner());

        let path = self.scratch_path(name);
        if !path.is_file() {
            log::warn!("ScratchStore: Cannot remove '{name}', no scratch file at {path:?}.");
            return false;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                log::debug!("ScratchStore: Removed scratch file {path:?}.");
                true
            }
            Err(e) => {
                log::error!("ScratchStore: Failed to remove scratch file {path:?}: {e}");
                false
            }
        }
    }

    fn rename(&self, name: &str, new_name: &str) -> bool {
        let _guard = self.mutation_lock.lock().unwrap_or_else(|e| e.into_inner());

        let from = self.scratch_path(name);
        if !from.is_file() {
            log::warn!("ScratchStore: Cannot rename '{name}', no scratch file at {from:?}.");
            return false;
        }
        let to = self.scratch_path(new_name);
        match fs::rename(&from, &to) {
            Ok(()) => {
                log::debug!("ScratchStore: Renamed scratch file {from:?} to {to:?}.");
                true
            }
            Err(e) => {
                log::error!("ScratchStore: Failed to rename scratch file {from:?} to {to:?}: {e}");
                false
            }
        }
    }

    fn is_member(&self, path: &Path) -> bool {
        let root = self.root_path();
        if path.parent() != Some(root.as_path()) {
            return false;
        }
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return false;
        };
        !Self::is_hidden_name(&name) && path.is_file()
    }
}
