//! Site settings kept in a JSON file next to the database
//!
//! The file only stores overrides; missing keys fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::LinkfolioError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub title: String,
    pub description: String,
    pub keywords: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub maintenance_mode: bool,
    pub social_links: SocialLinks,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: "linkfolio".to_string(),
            description: "Personal blog and portfolio".to_string(),
            keywords: "blog, portfolio, developer".to_string(),
            logo_url: None,
            maintenance_mode: false,
            social_links: SocialLinks::default(),
        }
    }
}

pub struct SiteSettingsStore {
    path: PathBuf,
}

impl SiteSettingsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Defaults merged with the file; an unreadable or invalid file yields defaults
    pub async fn get(&self) -> SiteSettings {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                debug!("Invalid settings file {}: {}", self.path.display(), e);
                SiteSettings::default()
            }),
            Err(_) => SiteSettings::default(),
        }
    }

    /// Shallow merge of the patch's top-level keys, then persist
    pub async fn update(&self, patch: Value) -> Result<SiteSettings, LinkfolioError> {
        let Value::Object(patch) = patch else {
            return Err(LinkfolioError::validation("Settings must be a JSON object"));
        };

        let mut merged = serde_json::to_value(self.get().await)?;
        if let Value::Object(current) = &mut merged {
            for (key, value) in patch {
                current.insert(key, value);
            }
        }

        let settings: SiteSettings = serde_json::from_value(merged)
            .map_err(|e| LinkfolioError::validation(format!("Invalid settings: {}", e)))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_string_pretty(&settings)?).await?;
        info!("Site settings written to {}", self.path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SiteSettingsStore::new(dir.path().join("none.json"));
        assert_eq!(store.get().await, SiteSettings::default());
    }

    #[tokio::test]
    async fn test_partial_file_merges_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"title":"My Site"}"#).unwrap();

        let settings = SiteSettingsStore::new(&path).get().await;
        assert_eq!(settings.title, "My Site");
        assert!(!settings.maintenance_mode);
        assert_eq!(settings.keywords, SiteSettings::default().keywords);
    }

    #[tokio::test]
    async fn test_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{broken").unwrap();
        assert_eq!(
            SiteSettingsStore::new(&path).get().await,
            SiteSettings::default()
        );
    }

    #[tokio::test]
    async fn test_update_is_shallow_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = SiteSettingsStore::new(dir.path().join("settings.json"));

        store
            .update(json!({"social_links": {"github": "https://github.com/me"}}))
            .await
            .unwrap();
        let updated = store
            .update(json!({"maintenance_mode": true, "social_links": {"twitter": "https://x.com/me"}}))
            .await
            .unwrap();

        assert!(updated.maintenance_mode);
        // 顶层浅合并：social_links 整体替换
        assert!(updated.social_links.github.is_none());
        assert_eq!(
            updated.social_links.twitter.as_deref(),
            Some("https://x.com/me")
        );
        assert_eq!(store.get().await, updated);
    }

    #[tokio::test]
    async fn test_update_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = SiteSettingsStore::new(dir.path().join("settings.json"));
        assert!(store.update(json!([1, 2])).await.is_err());
    }
}
