//! Settings service
//!
//! Manages content settings persistence using JSON file storage.

use crate::config::{
    DEFAULT_ENTRY_LIMIT, DEFAULT_TOC_LEVEL, MAX_TOC_LEVEL, MIN_TOC_LEVEL, SETTINGS_FILE_NAME,
};
use crate::error::{ContentError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

/// How stored content is turned into HTML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderSettings {
    /// Value substituted for the `[BASEURL]` shorttag
    #[serde(default)]
    pub base_url: String,
    /// Deepest heading level included in a table of contents
    #[serde(default = "default_toc_level")]
    pub toc_level: u8,
}

fn default_toc_level() -> u8 {
    DEFAULT_TOC_LEVEL
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            toc_level: default_toc_level(),
        }
    }
}

/// Listing defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSettings {
    /// Row cap for `get_entries` when the caller gives none. 0 means no cap.
    #[serde(default = "default_entry_limit")]
    pub entry_limit: u32,
}

fn default_entry_limit() -> u32 {
    DEFAULT_ENTRY_LIMIT
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            entry_limit: default_entry_limit(),
        }
    }
}

/// Content settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContentSettings {
    /// Root of the datafile tree. Defaults to the settings directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub rendering: RenderSettings,
    #[serde(default)]
    pub listing: ListingSettings,
}

impl ContentSettings {
    fn validate(&self) -> Result<()> {
        let level = self.rendering.toc_level;
        if !(MIN_TOC_LEVEL..=MAX_TOC_LEVEL).contains(&level) {
            return Err(ContentError::Generic(format!(
                "TOC level {} is outside {}..={}",
                level, MIN_TOC_LEVEL, MAX_TOC_LEVEL
            )));
        }
        Ok(())
    }
}

/// Service for managing content settings
#[derive(Clone)]
pub struct SettingsService {
    app_data_dir: PathBuf,
    settings_path: PathBuf,
}

impl SettingsService {
    pub fn new(app_data_dir: PathBuf) -> Self {
        Self {
            settings_path: app_data_dir.join(SETTINGS_FILE_NAME),
            app_data_dir,
        }
    }

    /// Load settings from disk or create default if not exists
    pub async fn load(&self) -> Result<ContentSettings> {
        if !self.settings_path.exists() {
            tracing::info!("Settings file not found, creating default settings");
            let default = ContentSettings::default();
            self.save(&default).await?;
            return Ok(default);
        }

        let content = fs::read_to_string(&self.settings_path).await?;
        let settings: ContentSettings = serde_json::from_str(&content)?;
        settings.validate()?;

        Ok(settings)
    }

    /// Save settings to disk
    pub async fn save(&self, settings: &ContentSettings) -> Result<()> {
        settings.validate()?;

        let content = serde_json::to_string_pretty(settings)?;
        fs::create_dir_all(&self.app_data_dir).await?;
        fs::write(&self.settings_path, content).await?;
        tracing::info!("Settings saved to {:?}", self.settings_path);

        Ok(())
    }

    /// Directory datafiles are resolved against
    pub fn data_dir(&self, settings: &ContentSettings) -> PathBuf {
        settings
            .data_dir
            .clone()
            .unwrap_or_else(|| self.app_data_dir.clone())
    }

    /// Get render settings
    pub async fn get_rendering(&self) -> Result<RenderSettings> {
        let settings = self.load().await?;
        Ok(settings.rendering)
    }

    /// Update render settings
    pub async fn update_rendering(&self, rendering: RenderSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.rendering = rendering;
        self.save(&settings).await?;
        Ok(())
    }

    /// Get listing settings
    pub async fn get_listing(&self) -> Result<ListingSettings> {
        let settings = self.load().await?;
        Ok(settings.listing)
    }

    /// Update listing settings
    pub async fn update_listing(&self, listing: ListingSettings) -> Result<()> {
        let mut settings = self.load().await?;
        settings.listing = listing;
        self.save(&settings).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (SettingsService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let service = SettingsService::new(temp_dir.path().to_path_buf());
        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_default_settings_created_on_load() {
        let (service, temp) = create_test_service();

        let settings = service.load().await.unwrap();

        assert_eq!(settings.listing.entry_limit, 7);
        assert_eq!(settings.rendering.toc_level, 4);
        assert_eq!(settings.rendering.base_url, "");
        assert!(temp.path().join("settings.json").exists());
        assert_eq!(service.data_dir(&settings), temp.path().to_path_buf());
    }

    #[tokio::test]
    async fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().to_path_buf();

        {
            let service = SettingsService::new(settings_path.clone());
            service
                .update_rendering(RenderSettings {
                    base_url: "https://example.com/".to_string(),
                    toc_level: 3,
                })
                .await
                .unwrap();
        }

        {
            let service = SettingsService::new(settings_path);
            let loaded = service.get_rendering().await.unwrap();
            assert_eq!(loaded.base_url, "https://example.com/");
            assert_eq!(loaded.toc_level, 3);
        }
    }

    #[tokio::test]
    async fn test_listing_preserved_after_rendering_update() {
        let (service, _temp) = create_test_service();

        service
            .update_listing(ListingSettings { entry_limit: 20 })
            .await
            .unwrap();
        service
            .update_rendering(RenderSettings::default())
            .await
            .unwrap();

        assert_eq!(service.get_listing().await.unwrap().entry_limit, 20);
    }

    #[tokio::test]
    async fn test_missing_fields_use_defaults() {
        let (service, temp) = create_test_service();

        std::fs::write(temp.path().join("settings.json"), r#"{"data_dir": "/srv/site"}"#).unwrap();

        let settings = service.load().await.unwrap();
        assert_eq!(settings.listing.entry_limit, 7);
        assert_eq!(service.data_dir(&settings), PathBuf::from("/srv/site"));
    }

    #[tokio::test]
    async fn test_invalid_toc_level_rejected() {
        let (service, _temp) = create_test_service();

        let result = service
            .update_rendering(RenderSettings {
                base_url: String::new(),
                toc_level: 9,
            })
            .await;

        assert!(result.is_err());
        assert_eq!(service.get_rendering().await.unwrap().toc_level, 4);
    }
}
