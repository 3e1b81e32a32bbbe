/*
 * This module provides utility functions for path manipulation, focusing on
 * retrieving and ensuring the existence of application-specific directories:
 * the per-user configuration directory (where the scratch config file lives)
 * and the default scratches directory (where scratch files live unless the
 * user points the application elsewhere).
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

const SCRATCHES_SUBFOLDER_NAME: &str = "scratches";

/*
 * Retrieves the application's primary local configuration directory.
 * This function determines the platform-specific path for local (non-roaming)
 * application configuration data. It ensures the directory exists, creating it
 * if necessary. The path is derived without using an organization qualifier,
 * placing it directly under the user's local application data directory
 * structure (e.g., AppData/Local on Windows).
 *
 * Returns `None` if the directory could not be determined or created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!(
        "PathUtils: Attempting to get base app config local dir for '{}'",
        app_name
    );
    ProjectDirs::from("", "", app_name).and_then(|proj_dirs| {
        let config_path = proj_dirs.config_local_dir();
        if !config_path.exists() {
            if let Err(e) = fs::create_dir_all(config_path) {
                log::error!(
                    "PathUtils: Failed to create base app config directory {:?}: {}",
                    config_path,
                    e
                );
                return None;
            }
            log::debug!(
                "PathUtils: Created base app config directory: {:?}",
                config_path
            );
        } else {
            log::trace!(
                "PathUtils: Base app config directory already exists: {:?}",
                config_path
            );
        }
        Some(config_path.to_path_buf())
    })
}

/*
 * Retrieves the default scratches directory: a "scratches" folder under the
 * application's local data directory. The folder is created if missing so a
 * first run starts with a usable (empty) scratches location. Users can point
 * the application at a different folder later; this is only the default.
 *
 * Returns `None` if the directory could not be determined or created.
 */
pub fn get_default_scratches_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!(
        "PathUtils: Attempting to get default scratches dir for '{}'",
        app_name
    );
    ProjectDirs::from("", "", app_name).and_then(|proj_dirs| {
        let scratches_path = proj_dirs.data_local_dir().join(SCRATCHES_SUBFOLDER_NAME);
        if !scratches_path.exists() {
            if let Err(e) = fs::create_dir_all(&scratches_path) {
                log::error!(
                    "PathUtils: Failed to create default scratches directory {:?}: {}",
                    scratches_path,
                    e
                );
                return None;
            }
            log::debug!(
                "PathUtils: Created default scratches directory: {:?}",
                scratches_path
            );
        } else {
            log::trace!(
                "PathUtils: Default scratches directory already exists: {:?}",
                scratches_path
            );
        }
        Some(scratches_path)
    })
}
