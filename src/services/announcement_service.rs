//! Announcements and homepage cards
//!
//! Homepage cards are announcements in the `homepage-card` slot.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::errors::LinkfolioError;
use crate::storage::{Announcement, SeaOrmStorage};

pub const DEFAULT_SLOT: &str = "events";
pub const HOMEPAGE_CARD_SLOT: &str = "homepage-card";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnouncementInput {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub background_url: Option<String>,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
    pub slot: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub struct AnnouncementService {
    storage: Arc<SeaOrmStorage>,
}

impl AnnouncementService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Active announcements ordered by `order`, optionally within one slot
    pub async fn list_active(&self, slot: Option<&str>) -> Result<Vec<Announcement>, LinkfolioError> {
        self.storage.list_active_announcements(slot).await
    }

    /// Every announcement, by slot then order
    pub async fn list_all(&self) -> Result<Vec<Announcement>, LinkfolioError> {
        self.storage.list_announcements(None).await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Announcement>, LinkfolioError> {
        self.storage.find_announcement_by_id(id).await
    }

    pub async fn create(&self, input: AnnouncementInput) -> Result<Announcement, LinkfolioError> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(LinkfolioError::validation("Title is required"));
        }

        let now = Utc::now();
        let announcement = Announcement {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            description: non_empty(input.description),
            background_url: non_empty(input.background_url),
            link_url: non_empty(input.link_url),
            link_text: non_empty(input.link_text),
            order: input.order.unwrap_or(0),
            is_active: input.is_active.unwrap_or(true),
            slot: non_empty(input.slot).unwrap_or_else(|| DEFAULT_SLOT.to_string()),
            created_at: now,
            updated_at: now,
        };

        self.storage.insert_announcement(&announcement).await?;
        info!(
            "AnnouncementService: created '{}' in slot {}",
            announcement.title, announcement.slot
        );
        Ok(announcement)
    }

    /// Fields absent from the input keep their stored value
    pub async fn update(
        &self,
        id: &str,
        input: AnnouncementInput,
    ) -> Result<Announcement, LinkfolioError> {
        let mut announcement = self
            .storage
            .find_announcement_by_id(id)
            .await?
            .ok_or_else(|| LinkfolioError::not_found(format!("Announcement not found: {}", id)))?;

        let title = input.title.trim();
        if !title.is_empty() {
            announcement.title = title.to_string();
        }
        if input.description.is_some() {
            announcement.description = non_empty(input.description);
        }
        if input.background_url.is_some() {
            announcement.background_url = non_empty(input.background_url);
        }
        if input.link_url.is_some() {
            announcement.link_url = non_empty(input.link_url);
        }
        if input.link_text.is_some() {
            announcement.link_text = non_empty(input.link_text);
        }
        if let Some(order) = input.order {
            announcement.order = order;
        }
        if let Some(is_active) = input.is_active {
            announcement.is_active = is_active;
        }
        if let Some(slot) = non_empty(input.slot) {
            announcement.slot = slot;
        }

        announcement.updated_at = Utc::now();
        self.storage.update_announcement(&announcement).await?;
        Ok(announcement)
    }

    pub async fn delete(&self, id: &str) -> Result<(), LinkfolioError> {
        if !self.storage.delete_announcement(id).await? {
            return Err(LinkfolioError::not_found(format!(
                "Announcement not found: {}",
                id
            )));
        }
        info!("AnnouncementService: deleted {}", id);
        Ok(())
    }

    pub async fn toggle_active(&self, id: &str) -> Result<Announcement, LinkfolioError> {
        let mut announcement = self
            .storage
            .find_announcement_by_id(id)
            .await?
            .ok_or_else(|| LinkfolioError::not_found(format!("Announcement not found: {}", id)))?;

        announcement.is_active = !announcement.is_active;
        announcement.updated_at = Utc::now();
        self.storage.update_announcement(&announcement).await?;
        Ok(announcement)
    }

    // ============ Homepage cards ============

    /// All cards for the admin panel
    pub async fn homepage_cards(&self) -> Result<Vec<Announcement>, LinkfolioError> {
        self.storage
            .list_announcements(Some(HOMEPAGE_CARD_SLOT))
            .await
    }

    pub async fn active_homepage_cards(&self) -> Result<Vec<Announcement>, LinkfolioError> {
        self.storage
            .list_active_announcements(Some(HOMEPAGE_CARD_SLOT))
            .await
    }

    pub async fn create_homepage_card(
        &self,
        mut input: AnnouncementInput,
    ) -> Result<Announcement, LinkfolioError> {
        input.slot = Some(HOMEPAGE_CARD_SLOT.to_string());
        input.is_active = Some(true);
        self.create(input).await
    }

    /// The card stays in the homepage slot whatever the input says
    pub async fn update_homepage_card(
        &self,
        id: &str,
        mut input: AnnouncementInput,
    ) -> Result<Announcement, LinkfolioError> {
        input.slot = None;
        self.update(id, input).await
    }
}
