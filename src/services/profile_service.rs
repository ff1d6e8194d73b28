//! Linktree profile service
//!
//! There is one public profile. It is created with defaults on first read and
//! edited section by section from the admin panel.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::errors::LinkfolioError;
use crate::storage::{CustomLink, Profile, SeaOrmStorage, ShowcaseItem};
use crate::utils::generate_from_alphabet;

pub const DEFAULT_PROFILE_THEME: &str = "dark";
pub const DEFAULT_SHOWCASE_TITLE: &str = "My Current Work";
/// Social section: a selected resume is always served from this route
pub const RESUME_ROUTE: &str = "/resume";
const SHORT_CODE_LENGTH: usize = 8;

fn generate_short_code() -> String {
    generate_from_alphabet(b"abcdefghijklmnopqrstuvwxyz0123456789", SHORT_CODE_LENGTH)
}

/// Keep `current` unless a non-empty value is supplied
fn merge_opt(current: &mut Option<String>, incoming: Option<String>) {
    if let Some(v) = incoming.filter(|v| !v.trim().is_empty()) {
        *current = Some(v);
    }
}

/// JSON list given as an array or as a JSON-encoded string; anything invalid is empty
pub fn parse_lenient_list<T: DeserializeOwned>(raw: Option<serde_json::Value>) -> Vec<T> {
    match raw {
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Vec::new(),
        Some(serde_json::Value::String(s)) => serde_json::from_str(&s).unwrap_or_default(),
        Some(value @ serde_json::Value::Array(_)) => {
            serde_json::from_value(value).unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

/// One admin-panel section edit
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "section", rename_all = "snake_case")]
pub enum ProfileUpdate {
    Profile {
        display_name: Option<String>,
        tagline: Option<String>,
        avatar_url: Option<String>,
        background_url: Option<String>,
        theme: Option<String>,
    },
    Social {
        selected_resume_id: Option<String>,
        resume_url: Option<String>,
        linkedin_url: Option<String>,
        instagram_url: Option<String>,
        twitter_url: Option<String>,
        github_url: Option<String>,
        email_url: Option<String>,
    },
    Showcase {
        showcase_title: Option<String>,
        showcase_items: Option<serde_json::Value>,
    },
    CustomLinks {
        custom_links: Option<serde_json::Value>,
    },
}

impl ProfileUpdate {
    pub fn section_name(&self) -> &'static str {
        match self {
            ProfileUpdate::Profile { .. } => "Profile",
            ProfileUpdate::Social { .. } => "Social links",
            ProfileUpdate::Showcase { .. } => "Showcase",
            ProfileUpdate::CustomLinks { .. } => "Custom links",
        }
    }

    /// Apply the section to a profile in place
    pub fn apply(self, profile: &mut Profile) {
        match self {
            ProfileUpdate::Profile {
                display_name,
                tagline,
                avatar_url,
                background_url,
                theme,
            } => {
                if let Some(name) = display_name.filter(|n| !n.trim().is_empty()) {
                    profile.display_name = name.trim().to_string();
                }
                merge_opt(&mut profile.tagline, tagline);
                merge_opt(&mut profile.avatar_url, avatar_url);
                merge_opt(&mut profile.background_url, background_url);
                profile.theme = theme
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| DEFAULT_PROFILE_THEME.to_string());
            }
            ProfileUpdate::Social {
                selected_resume_id,
                resume_url,
                linkedin_url,
                instagram_url,
                twitter_url,
                github_url,
                email_url,
            } => {
                let selected = selected_resume_id.filter(|id| !id.is_empty());
                let resume_url = if selected.is_some() {
                    Some(RESUME_ROUTE.to_string())
                } else {
                    resume_url
                };
                merge_opt(&mut profile.selected_resume_id, selected);
                merge_opt(&mut profile.resume_url, resume_url);
                merge_opt(&mut profile.linkedin_url, linkedin_url);
                merge_opt(&mut profile.instagram_url, instagram_url);
                merge_opt(&mut profile.twitter_url, twitter_url);
                merge_opt(&mut profile.github_url, github_url);
                merge_opt(&mut profile.email_url, email_url);
            }
            ProfileUpdate::Showcase {
                showcase_title,
                showcase_items,
            } => {
                profile.showcase_title = showcase_title
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| DEFAULT_SHOWCASE_TITLE.to_string());
                profile.showcase_items = parse_lenient_list::<ShowcaseItem>(showcase_items);
            }
            ProfileUpdate::CustomLinks { custom_links } => {
                profile.custom_links = parse_lenient_list::<CustomLink>(custom_links);
            }
        }
    }
}

pub struct ProfileService {
    storage: Arc<SeaOrmStorage>,
    site_url: String,
}

impl ProfileService {
    pub fn new(storage: Arc<SeaOrmStorage>, site_url: impl Into<String>) -> Self {
        Self {
            storage,
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Canonical public path target for a short code
    pub fn profile_url(&self, short_code: &str) -> String {
        format!("{}/me/{}", self.site_url, short_code)
    }

    /// The active profile, created with defaults when none exists
    pub async fn get_profile(&self) -> Result<Profile, LinkfolioError> {
        if let Some(profile) = self.storage.find_active_profile().await? {
            return Ok(profile);
        }
        self.create_default_profile().await
    }

    async fn create_default_profile(&self) -> Result<Profile, LinkfolioError> {
        let now = Utc::now();
        let profile = Profile {
            id: uuid::Uuid::new_v4().to_string(),
            display_name: "My Profile".to_string(),
            tagline: None,
            avatar_url: None,
            background_url: None,
            theme: DEFAULT_PROFILE_THEME.to_string(),
            resume_url: None,
            selected_resume_id: None,
            linkedin_url: None,
            instagram_url: None,
            twitter_url: None,
            github_url: None,
            email_url: None,
            showcase_title: DEFAULT_SHOWCASE_TITLE.to_string(),
            showcase_items: Vec::new(),
            custom_links: Vec::new(),
            short_code: generate_short_code(),
            qr_code_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.storage.insert_profile(&profile).await?;
        info!(
            "ProfileService: created default profile '{}'",
            profile.short_code
        );
        Ok(profile)
    }

    pub async fn get_profile_by_short_code(
        &self,
        short_code: &str,
    ) -> Result<Option<Profile>, LinkfolioError> {
        self.storage.find_profile_by_short_code(short_code).await
    }

    /// Apply one section edit
    pub async fn update_profile(
        &self,
        id: &str,
        update: ProfileUpdate,
    ) -> Result<Profile, LinkfolioError> {
        let mut profile = self
            .storage
            .find_profile_by_id(id)
            .await?
            .ok_or_else(|| LinkfolioError::not_found(format!("Profile not found: {}", id)))?;

        let section = update.section_name();
        update.apply(&mut profile);
        profile.updated_at = Utc::now();

        self.storage.update_profile(&profile).await?;
        info!("ProfileService: {} section updated", section);
        Ok(profile)
    }

    pub async fn update_profile_qr_url(
        &self,
        id: &str,
        qr_code_url: &str,
    ) -> Result<Profile, LinkfolioError> {
        let mut profile = self
            .storage
            .find_profile_by_id(id)
            .await?
            .ok_or_else(|| LinkfolioError::not_found(format!("Profile not found: {}", id)))?;

        profile.qr_code_url = Some(qr_code_url.to_string());
        profile.updated_at = Utc::now();
        self.storage.update_profile(&profile).await?;
        Ok(profile)
    }

    /// New random short code; the previous `/me/{code}` link stops resolving
    pub async fn regenerate_short_code(&self, id: &str) -> Result<Profile, LinkfolioError> {
        let mut profile = self
            .storage
            .find_profile_by_id(id)
            .await?
            .ok_or_else(|| LinkfolioError::not_found(format!("Profile not found: {}", id)))?;

        profile.short_code = generate_short_code();
        profile.updated_at = Utc::now();
        self.storage.update_profile(&profile).await?;
        info!("ProfileService: short code regenerated");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_profile() -> Profile {
        let now = Utc::now();
        Profile {
            id: "p1".to_string(),
            display_name: "Jane".to_string(),
            tagline: Some("Engineer".to_string()),
            avatar_url: None,
            background_url: None,
            theme: "dark".to_string(),
            resume_url: Some("https://cdn.example.com/cv.pdf".to_string()),
            selected_resume_id: None,
            linkedin_url: None,
            instagram_url: None,
            twitter_url: None,
            github_url: None,
            email_url: None,
            showcase_title: DEFAULT_SHOWCASE_TITLE.to_string(),
            showcase_items: Vec::new(),
            custom_links: Vec::new(),
            short_code: "abcd1234".to_string(),
            qr_code_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_selected_resume_forces_resume_route() {
        let mut p = sample_profile();
        let update: ProfileUpdate = serde_json::from_value(json!({
            "section": "social",
            "selected_resume_id": "r1",
            "resume_url": "https://elsewhere.example.com/cv.pdf",
            "github_url": "https://github.com/jane"
        }))
        .unwrap();
        update.apply(&mut p);
        assert_eq!(p.resume_url.as_deref(), Some(RESUME_ROUTE));
        assert_eq!(p.selected_resume_id.as_deref(), Some("r1"));
        assert_eq!(p.github_url.as_deref(), Some("https://github.com/jane"));
    }

    #[test]
    fn test_showcase_invalid_json_becomes_empty() {
        let mut p = sample_profile();
        p.showcase_items = vec![ShowcaseItem {
            name: "Old".to_string(),
            url: "https://old.example.com".to_string(),
            description: None,
            icon: None,
        }];
        ProfileUpdate::Showcase {
            showcase_title: None,
            showcase_items: Some(json!("{not json")),
        }
        .apply(&mut p);
        assert!(p.showcase_items.is_empty());
        assert_eq!(p.showcase_title, DEFAULT_SHOWCASE_TITLE);
    }

    #[test]
    fn test_custom_links_accept_string_or_array() {
        let mut p = sample_profile();
        ProfileUpdate::CustomLinks {
            custom_links: Some(json!(r#"[{"title":"Blog","url":"/blog"}]"#)),
        }
        .apply(&mut p);
        assert_eq!(p.custom_links.len(), 1);

        ProfileUpdate::CustomLinks {
            custom_links: Some(json!([{"title":"A","url":"/a"},{"title":"B","url":"/b"}])),
        }
        .apply(&mut p);
        assert_eq!(p.custom_links.len(), 2);
    }

    #[test]
    fn test_profile_section_defaults_theme_and_keeps_empty_fields() {
        let mut p = sample_profile();
        ProfileUpdate::Profile {
            display_name: Some("".to_string()),
            tagline: Some("".to_string()),
            avatar_url: None,
            background_url: None,
            theme: None,
        }
        .apply(&mut p);
        assert_eq!(p.display_name, "Jane");
        assert_eq!(p.tagline.as_deref(), Some("Engineer"));
        assert_eq!(p.theme, DEFAULT_PROFILE_THEME);
    }
}
