//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default browser page bound.
const DEFAULT_TOTAL_PAGES: u32 = 500;

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Catalog client settings.
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Browser settings.
    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Catalog client configuration. Credentials are read from the
/// environment, never from this file.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Response language (e.g. `en-US`).
    #[serde(default = "default_language")]
    pub language: String,
    /// Request timeout in seconds; `0` disables it.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// API base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Browser configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Upper page bound for category pagination.
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,
}

fn default_language() -> String {
    String::from(DEFAULT_LANGUAGE)
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

const fn default_total_pages() -> u32 {
    DEFAULT_TOTAL_PAGES
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: None,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            total_pages: DEFAULT_TOTAL_PAGES,
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert_eq!(config.catalog.language, "en-US");
        assert_eq!(config.catalog.timeout_secs, 30);
        assert!(config.catalog.base_url.is_none());
        assert_eq!(config.browser.total_pages, 500);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = AppConfig {
            catalog: CatalogConfig {
                language: String::from("ja-JP"),
                timeout_secs: 10,
                base_url: Some(String::from("http://127.0.0.1:8080/3/")),
            },
            browser: BrowserConfig { total_pages: 20 },
        };

        // Act
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[catalog]\nlanguage = \"fr-FR\"\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.catalog.language, "fr-FR");
        assert_eq!(config.catalog.timeout_secs, 30);
        assert_eq!(config.browser, BrowserConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[browser]\ntotal_pages = \"many\"\n").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.unwrap_err().to_string().contains("failed to parse"));
    }
}
