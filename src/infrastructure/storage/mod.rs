//! Persisted balance configuration.

pub mod json_config_store;

pub use json_config_store::{JsonConfigStore, CONFIG_FILE_NAME};
