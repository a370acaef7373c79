/// Application configuration.
///
/// Stored as JSON in the user's config directory:
/// - Linux: ~/.config/photo-grid/config.json
/// - macOS: ~/Library/Application Support/photo-grid/config.json
/// - Windows: %APPDATA%\photo-grid\config.json
///
/// Every field is optional in the file; environment variables win over it.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

pub const BACKEND_URL_ENV: &str = "PHOTO_GRID_BACKEND_URL";
pub const GALLERY_DIR_ENV: &str = "PHOTO_GRID_GALLERY_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GalleryConfig {
    /// Endpoint of the private gallery backend; private galleries are off without it
    pub backend_url: Option<String>,
    /// Folder opened as a public gallery on start-up
    pub gallery_dir: Option<PathBuf>,
    /// Timeout for backend requests, in seconds
    pub request_timeout_secs: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            gallery_dir: None,
            request_timeout_secs: 15,
        }
    }
}

impl GalleryConfig {
    /// Where the config file is expected
    pub fn config_path() -> Option<PathBuf> {
        let mut path = dirs::config_dir().or_else(dirs::home_dir)?;
        path.push("photo-grid");
        path.push("config.json");
        Some(path)
    }

    /// Load from the default location, then apply environment overrides.
    /// A broken file is reported and ignored.
    pub fn load() -> Self {
        let from_file = match Self::config_path() {
            Some(path) => Self::load_from(&path).unwrap_or_else(|e| {
                warn!("⚠️  Ignoring config at {}: {}", path.display(), e);
                Self::default()
            }),
            None => Self::default(),
        };

        from_file.apply_env(|key| std::env::var(key).ok())
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        info!("📁 Config loaded from: {}", path.display());
        Ok(config)
    }

    /// Override fields from environment-style lookups (empty values are ignored)
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(url) = non_empty(BACKEND_URL_ENV) {
            self.backend_url = Some(url);
        }
        if let Some(dir) = non_empty(GALLERY_DIR_ENV) {
            self.gallery_dir = Some(PathBuf::from(dir));
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GalleryConfig::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, GalleryConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"backend_url": "https://example.com/private-gallery"}"#).unwrap();

        let config = GalleryConfig::load_from(&path).unwrap();
        assert_eq!(config.backend_url.as_deref(), Some("https://example.com/private-gallery"));
        assert_eq!(config.request_timeout_secs, 15);
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(GalleryConfig::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> = [
            (BACKEND_URL_ENV, "http://localhost:8080/"),
            (GALLERY_DIR_ENV, ""),
        ]
        .into_iter()
        .collect();

        let config = GalleryConfig {
            backend_url: Some("https://from-file/".to_string()),
            gallery_dir: Some(PathBuf::from("/srv/photos")),
            request_timeout_secs: 5,
        }
        .apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend_url.as_deref(), Some("http://localhost:8080/"));
        assert_eq!(config.gallery_dir, Some(PathBuf::from("/srv/photos")));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }
}
