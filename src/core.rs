/*
 * This module consolidates the core, host-agnostic logic of the application.
 * It re-exports the scratch entry and collection types, the process-wide
 * config cell, and the operations abstractions (`ScratchStoreOperations`,
 * `RelocationOperations`, `ConfigManagerOperations`) for filesystem-backed
 * scratch storage, bulk relocation, name validation, and configuration
 * persistence, plus path utilities.
 */
pub mod config;
pub mod config_cell;
pub mod path_utils;
pub mod relocation;
pub mod scratch;
pub mod scratch_config;
pub mod scratch_store;
pub mod validation;

// Re-export key structures and enums
pub use scratch::Scratch;
pub use scratch_config::{AppendPolicy, DefaultSelectionPolicy, ScratchConfig};

pub use config_cell::ConfigCell;

// Re-export store related items
pub use scratch_store::{CoreScratchStore, ScratchStoreOperations};

// Re-export relocation related items
pub use relocation::{CoreRelocator, RelocationError, RelocationOperations};

// Re-export validation related items
pub use validation::{NameRejection, validate_new_name};

// Re-export config persistence related items
pub use config::{ConfigManagerOperations, CoreConfigManager};

#[cfg(test)]
pub use config::ConfigError;
