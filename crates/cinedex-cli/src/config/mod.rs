//! Application configuration module.
//!
//! Manages the TOML config file (catalog language, timeout, base URL and
//! browser page bound) and the data directory that holds the log file.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, CatalogConfig};
pub use paths::{resolve_config_path, resolve_data_dir};
