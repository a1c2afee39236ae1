//! Configuration module for SwipePedia

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::ProviderKind;
use crate::models::{BookmarkSortOrder, Language};
use crate::paths;
use crate::theme::Theme;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Selected theme
    #[serde(default)]
    pub theme: Theme,

    /// Wikipedia edition to pull articles from
    #[serde(default)]
    pub language: Language,

    /// How the bookmark list is ordered
    #[serde(default)]
    pub bookmark_sort: BookmarkSortOrder,

    /// Whether to render card images in the terminal
    #[serde(default = "default_show_images")]
    pub show_images: bool,

    /// Whether to write local analytics events
    #[serde(default = "default_analytics")]
    pub analytics: bool,

    /// Image search providers, tried in order. The generic fallback
    /// query is sent to the last one.
    #[serde(default = "default_image_providers")]
    pub image_providers: Vec<ProviderKind>,

    /// Unsplash access key
    #[serde(default)]
    pub unsplash_access_key: Option<String>,

    /// Pixabay API key
    #[serde(default)]
    pub pixabay_api_key: Option<String>,

    /// Bing image search subscription key
    #[serde(default)]
    pub bing_api_key: Option<String>,
}

fn default_show_images() -> bool {
    true
}

fn default_analytics() -> bool {
    true
}

fn default_image_providers() -> Vec<ProviderKind> {
    vec![ProviderKind::DuckDuckGo, ProviderKind::Unsplash]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            language: Language::default(),
            bookmark_sort: BookmarkSortOrder::default(),
            show_images: default_show_images(),
            analytics: default_analytics(),
            image_providers: default_image_providers(),
            unsplash_access_key: None,
            pixabay_api_key: None,
            bing_api_key: None,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        paths::config_path()
    }

    /// Load config from the default path or create default
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Load config from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()?;
        self.save_to(&path)
    }

    /// Save config to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.language, Language::English);
        assert_eq!(
            config.image_providers,
            vec![ProviderKind::DuckDuckGo, ProviderKind::Unsplash]
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "language = \"fr\"\nimage_providers = [\"pixabay\"]\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.language, Language::French);
        assert_eq!(config.image_providers, vec![ProviderKind::Pixabay]);
        assert!(config.show_images);
        assert_eq!(config.bookmark_sort, BookmarkSortOrder::MostRecent);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.language = Language::Japanese;
        config.bookmark_sort = BookmarkSortOrder::Alphabetical;
        config.unsplash_access_key = Some("key".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.language, Language::Japanese);
        assert_eq!(loaded.bookmark_sort, BookmarkSortOrder::Alphabetical);
        assert_eq!(loaded.unsplash_access_key.as_deref(), Some("key"));
    }
}
