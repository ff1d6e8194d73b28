//! Guestbook with admin moderation

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::errors::LinkfolioError;
use crate::storage::{GuestbookEntry, SeaOrmStorage};

pub const PUBLIC_LIST_LIMIT: u64 = 100;
const MIN_AUTHOR_CHARS: usize = 2;
const MIN_CONTENT_CHARS: usize = 5;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewGuestbookEntry {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub content: String,
}

impl NewGuestbookEntry {
    /// Trimmed (author, content) when both meet the minimum length
    fn validated(&self) -> Result<(String, String), LinkfolioError> {
        let author = self.author.trim();
        let content = self.content.trim();
        if author.chars().count() < MIN_AUTHOR_CHARS {
            return Err(LinkfolioError::validation(format!(
                "Name must be at least {} characters",
                MIN_AUTHOR_CHARS
            )));
        }
        if content.chars().count() < MIN_CONTENT_CHARS {
            return Err(LinkfolioError::validation(format!(
                "Message must be at least {} characters",
                MIN_CONTENT_CHARS
            )));
        }
        Ok((author.to_string(), content.to_string()))
    }
}

/// Admin list filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GuestbookFilter {
    #[default]
    All,
    Pending,
    Approved,
}

impl GuestbookFilter {
    fn approved(self) -> Option<bool> {
        match self {
            GuestbookFilter::All => None,
            GuestbookFilter::Pending => Some(false),
            GuestbookFilter::Approved => Some(true),
        }
    }
}

pub struct GuestbookService {
    storage: Arc<SeaOrmStorage>,
}

impl GuestbookService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Approved entries, newest first
    pub async fn list_approved(&self) -> Result<Vec<GuestbookEntry>, LinkfolioError> {
        self.storage
            .list_guestbook_entries(Some(true), Some(PUBLIC_LIST_LIMIT))
            .await
    }

    pub async fn list_entries(
        &self,
        filter: GuestbookFilter,
    ) -> Result<Vec<GuestbookEntry>, LinkfolioError> {
        self.storage
            .list_guestbook_entries(filter.approved(), None)
            .await
    }

    /// Stored unapproved until an admin approves it
    pub async fn submit(&self, input: NewGuestbookEntry) -> Result<GuestbookEntry, LinkfolioError> {
        let (author, content) = input.validated()?;
        let entry = GuestbookEntry {
            id: uuid::Uuid::new_v4().to_string(),
            author,
            content,
            approved: false,
            created_at: Utc::now(),
        };
        self.storage.insert_guestbook_entry(&entry).await?;
        info!("GuestbookService: new entry from '{}'", entry.author);
        Ok(entry)
    }

    pub async fn approve(&self, id: &str) -> Result<(), LinkfolioError> {
        if !self.storage.approve_guestbook_entry(id).await? {
            return Err(LinkfolioError::not_found(format!(
                "Guestbook entry not found: {}",
                id
            )));
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), LinkfolioError> {
        if !self.storage.delete_guestbook_entry(id).await? {
            return Err(LinkfolioError::not_found(format!(
                "Guestbook entry not found: {}",
                id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(author: &str, content: &str) -> NewGuestbookEntry {
        NewGuestbookEntry {
            author: author.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_validation_trims_before_counting() {
        assert!(entry(" a ", "hello world").validated().is_err());
        assert!(entry("Al", "  hi  ").validated().is_err());
        let (author, content) = entry("  Al ", " hello ").validated().unwrap();
        assert_eq!(author, "Al");
        assert_eq!(content, "hello");
    }

    #[test]
    fn test_filter_mapping() {
        assert_eq!(GuestbookFilter::All.approved(), None);
        assert_eq!(GuestbookFilter::Pending.approved(), Some(false));
        let f: GuestbookFilter = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(f.approved(), Some(true));
    }
}
