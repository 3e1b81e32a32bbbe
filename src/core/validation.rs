/*
 * Decides whether a proposed scratch name is acceptable. Filesystem
 * validity is checked first through the store, then the domain rule that
 * no collection entry may already carry the name. The rejection reasons
 * are structured so the host can show a message that distinguishes "not a
 * valid file name" from "file already exists".
 */
use super::scratch_config::ScratchConfig;
use super::scratch_store::ScratchStoreOperations;

#[derive(Debug)]
pub enum NameRejection {
    InvalidFileName(String),
    AlreadyExists(String),
    DuplicateEntry(String),
}

impl std::fmt::Display for NameRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameRejection::InvalidFileName(name) => {
                write!(f, "Not a valid file name: '{name}'")
            }
            NameRejection::AlreadyExists(name) => {
                write!(f, "File already exists: '{name}'")
            }
            NameRejection::DuplicateEntry(name) => {
                write!(f, "There is already a scratch named '{name}'")
            }
        }
    }
}

impl std::error::Error for NameRejection {}

/*
 * Validates `name` for a new or renamed scratch: the store's filesystem
 * check runs first, the duplicate-entry check against the collection
 * second. Both must pass before any file is touched.
 */
pub fn validate_new_name(
    store: &dyn ScratchStoreOperations,
    config: &ScratchConfig,
    name: &str,
) -> Result<(), NameRejection> {
    store.is_valid_name(name)?;
    if config.entries().iter().any(|s| s.name == name) {
        return Err(NameRejection::DuplicateEntry(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scratch::Scratch;
    use crate::core::scratch_store::CoreScratchStore;
    use tempfile::tempdir;

    #[test]
    fn test_accepts_unused_plain_name() {
        let dir = tempdir().expect("Failed to create temp dir for test");
        let store = CoreScratchStore::new(dir.path().to_path_buf());
        let config = ScratchConfig::default();

        assert!(validate_new_name(&store, &config, "notes.txt").is_ok());
    }

    #[test]
    fn test_filesystem_rules_run_before_domain_rules() {
        let dir = tempdir().expect("Failed to create temp dir for test");
        let store = CoreScratchStore::new(dir.path().to_path_buf());
        // The collection also contains ".hidden", but the filesystem rule
        // must win since it is checked first.
        let config = ScratchConfig::default().add(Scratch::new(".hidden"));

        assert!(matches!(
            validate_new_name(&store, &config, ".hidden"),
            Err(NameRejection::InvalidFileName(_))
        ));
    }

    #[test]
    fn test_rejects_name_held_by_a_collection_entry() {
        let dir = tempdir().expect("Failed to create temp dir for test");
        let store = CoreScratchStore::new(dir.path().to_path_buf());
        // No file on disk, only the collection knows the name.
        let config = ScratchConfig::default().add(Scratch::new("tracked.txt"));

        assert!(matches!(
            validate_new_name(&store, &config, "tracked.txt"),
            Err(NameRejection::DuplicateEntry(_))
        ));
    }

    #[test]
    fn test_rejects_name_colliding_with_file_on_disk() {
        let dir = tempdir().expect("Failed to create temp dir for test");
        let store = CoreScratchStore::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join("stray.txt"), "untracked").unwrap();
        let config = ScratchConfig::default();

        assert!(matches!(
            validate_new_name(&store, &config, "stray.txt"),
            Err(NameRejection::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_rejection_messages_distinguish_reasons() {
        let invalid = NameRejection::InvalidFileName("a/b".to_string()).to_string();
        let exists = NameRejection::AlreadyExists("notes.txt".to_string()).to_string();

        assert!(invalid.contains("Not a valid file name"));
        assert!(exists.contains("File already exists"));
        assert_ne!(invalid, exists);
    }
}
