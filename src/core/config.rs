/*
 * Persists the scratch collection across process restarts. The current
 * `ScratchConfig` value is written as pretty-printed JSON to
 * `scratch_config.json` in the per-user configuration directory and read
 * back at startup; a missing file is a first run, not an error.
 *
 * It uses a trait-based approach (`ConfigManagerOperations`) to allow for
 * different storage backends or mock implementations for testing. The
 * primary concrete implementation (`CoreConfigManager`) handles file system
 * interactions, utilizing a shared path utility for determining the base
 * configuration directory.
 */
use crate::core::path_utils;
use crate::core::scratch_config::ScratchConfig;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};

const SCRATCH_CONFIG_FILENAME: &str = "scratch_config.json";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoConfigDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Serde(e) => write!(f, "Configuration serialization error: {e}"),
            ConfigError::NoConfigDirectory => {
                write!(f, "Could not determine configuration directory")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub trait ConfigManagerOperations: Send + Sync {
    fn load_config(&self, app_name: &str) -> Result<Option<ScratchConfig>>;
    fn save_config(&self, app_name: &str, config: &ScratchConfig) -> Result<()>;
}

pub struct CoreConfigManager {}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {}
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManagerOperations for CoreConfigManager {
    /*
     * Loads the persisted scratch collection for a given application.
     * It uses `path_utils::get_base_app_config_local_dir` to find the
     * application's local configuration directory and reads
     * `scratch_config.json` within it. A missing file yields `Ok(None)`
     * (first run); a malformed file is a `Serde` error.
     */
    fn load_config(&self, app_name: &str) -> Result<Option<ScratchConfig>> {
        log::trace!("CoreConfigManager: Loading scratch config for app '{app_name}'");
        let config_dir = path_utils::get_base_app_config_local_dir(app_name)
            .ok_or(ConfigError::NoConfigDirectory)?;
        let file_path = config_dir.join(SCRATCH_CONFIG_FILENAME);

        if !file_path.exists() {
            log::debug!("CoreConfigManager: Config file {file_path:?} does not exist.");
            return Ok(None);
        }

        let file = File::open(&file_path)?;
        let reader = BufReader::new(file);
        let config: ScratchConfig = serde_json::from_reader(reader)?;
        log::debug!(
            "CoreConfigManager: Loaded scratch config with {} entries from {file_path:?}.",
            config.entries().len()
        );
        Ok(Some(config))
    }

    /*
     * Saves the full scratch collection for a given application as pretty
     * JSON, overwriting any previous file.
     */
    fn save_config(&self, app_name: &str, config: &ScratchConfig) -> Result<()> {
        log::trace!("CoreConfigManager: Saving scratch config for app '{app_name}'");
        let config_dir = path_utils::get_base_app_config_local_dir(app_name)
            .ok_or(ConfigError::NoConfigDirectory)?;
        let file_path = config_dir.join(SCRATCH_CONFIG_FILENAME);

        let file = File::create(&file_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, config)?;
        log::debug!(
            "CoreConfigManager: Saved scratch config with {} entries to {file_path:?}.",
            config.entries().len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scratch::Scratch;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    // Test helper that persists to a caller-supplied directory instead of
    // the real per-user configuration directory.
    struct TestConfigManager {
        mock_config_dir: PathBuf,
    }

    impl TestConfigManager {
        fn new(mock_config_dir: PathBuf) -> Self {
            if !mock_config_dir.exists() {
                fs::create_dir_all(&mock_config_dir)
                    .expect("Failed to create mock config dir for test");
            }
            TestConfigManager { mock_config_dir }
        }
    }

    impl ConfigManagerOperations for TestConfigManager {
        fn load_config(&self, _app_name: &str) -> Result<Option<ScratchConfig>> {
            let file_path = self.mock_config_dir.join(SCRATCH_CONFIG_FILENAME);
            if !file_path.exists() {
                return Ok(None);
            }
            let file = File::open(&file_path)?;
            let config: ScratchConfig = serde_json::from_reader(BufReader::new(file))?;
            Ok(Some(config))
        }

        fn save_config(&self, _app_name: &str, config: &ScratchConfig) -> Result<()> {
            let file_path = self.mock_config_dir.join(SCRATCH_CONFIG_FILENAME);
            let file = File::create(&file_path)?;
            serde_json::to_writer_pretty(BufWriter::new(file), config)?;
            Ok(())
        }
    }

    fn sample_config() -> ScratchConfig {
        ScratchConfig::default()
            .with_needs_migration(false)
            .add(Scratch::new("todo.txt"))
            .add(Scratch::new("snippets.txt"))
            .with_last_selected(Some(Scratch::new("todo.txt")))
            .with_clipboard_listening(true)
    }

    #[test]
    fn test_core_config_manager_save_and_load_round_trip() {
        // Arrange
        let unique_app_name = format!("TestApp_ScratchConfig_{}", rand::random::<u64>());
        let manager = CoreConfigManager::new();
        let config = sample_config();

        // Act & Assert Save
        assert!(
            manager.save_config(&unique_app_name, &config).is_ok(),
            "Saving scratch config should succeed."
        );

        // Act & Assert Load
        match manager.load_config(&unique_app_name) {
            Ok(Some(loaded)) => assert_eq!(loaded, config),
            Ok(None) => panic!("Expected to load a config, but got None."),
            Err(e) => panic!("Failed to load config: {e:?}"),
        }

        // Cleanup the test app's config directory.
        if let Some(config_dir) = path_utils::get_base_app_config_local_dir(&unique_app_name) {
            if let Err(e) = fs::remove_dir_all(&config_dir) {
                eprintln!("Test cleanup failed for config dir {config_dir:?}: {e}");
            }
        }
    }

    #[test]
    fn test_load_config_returns_none_on_first_run() {
        let dir = tempdir().unwrap();
        let manager = TestConfigManager::new(dir.path().to_path_buf());

        match manager.load_config("AnyApp") {
            Ok(None) => {}
            Ok(Some(_)) => panic!("Expected None when no config file exists."),
            Err(e) => panic!("Unexpected error when no config file exists: {e:?}"),
        }
    }

    #[test]
    fn test_load_config_reports_malformed_file_as_serde_error() {
        let dir = tempdir().unwrap();
        let manager = TestConfigManager::new(dir.path().to_path_buf());
        fs::write(dir.path().join(SCRATCH_CONFIG_FILENAME), "not json at all").unwrap();

        assert!(matches!(
            manager.load_config("AnyApp"),
            Err(ConfigError::Serde(_))
        ));
    }

    #[test]
    fn test_save_config_overwrites_previous_value() {
        let dir = tempdir().unwrap();
        let manager = TestConfigManager::new(dir.path().to_path_buf());
        let first = sample_config();
        let second = first.add(Scratch::new("extra.txt"));

        manager.save_config("AnyApp", &first).unwrap();
        manager.save_config("AnyApp", &second).unwrap();

        let loaded = manager.load_config("AnyApp").unwrap().unwrap();
        assert_eq!(loaded, second);
        assert_eq!(loaded.entries().len(), 3);
    }
}
