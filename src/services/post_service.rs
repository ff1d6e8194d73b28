//! Blog post service

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use crate::errors::LinkfolioError;
use crate::storage::backend::PostCounter;
use crate::storage::{Post, PostFilter, PostPage, PostStats, SeaOrmStorage};
use crate::utils::{reading_time_minutes, slugify, truncate_chars};

pub const DEFAULT_POST_TYPE: &str = "ARTICLE";
pub const DEFAULT_COVER_IMAGE: &str = "/default-cover.jpg";
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const MAX_PAGE_SIZE: u64 = 100;
pub const FEATURED_LIMIT: u64 = 5;
pub const POPULAR_LIMIT: u64 = 10;
const SUMMARY_CHARS: usize = 200;

/// Post lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../admin-panel/src/services/types.generated.ts")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

impl PostStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
            PostStatus::Archived => "archived",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../admin-panel/src/services/types.generated.ts")]
pub struct CreatePostInput {
    pub title: String,
    #[ts(optional)]
    pub slug: Option<String>,
    pub content: String,
    #[ts(optional)]
    pub summary: Option<String>,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    #[ts(optional)]
    pub post_type: Option<String>,
    #[ts(optional)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub gallery: Vec<String>,
    #[ts(optional)]
    pub status: Option<PostStatus>,
    #[ts(optional)]
    pub pricing: Option<String>,
    #[ts(optional)]
    pub price: Option<i64>,
    #[ts(optional)]
    pub access_level: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../admin-panel/src/services/types.generated.ts")]
pub struct UpdatePostInput {
    #[ts(optional)]
    pub title: Option<String>,
    #[ts(optional)]
    pub slug: Option<String>,
    #[ts(optional)]
    pub content: Option<String>,
    #[ts(optional)]
    pub summary: Option<String>,
    #[ts(optional)]
    pub author_id: Option<String>,
    #[ts(optional)]
    pub category_ids: Option<Vec<String>>,
    #[ts(optional)]
    pub tag_ids: Option<Vec<String>>,
    #[ts(optional)]
    pub post_type: Option<String>,
    #[ts(optional)]
    pub cover_image: Option<String>,
    #[ts(optional)]
    pub gallery: Option<Vec<String>>,
    #[ts(optional)]
    pub status: Option<PostStatus>,
    #[ts(optional)]
    pub pricing: Option<String>,
    #[ts(optional)]
    pub price: Option<i64>,
    #[ts(optional)]
    pub access_level: Option<String>,
    #[ts(optional)]
    pub featured: Option<bool>,
}

pub struct PostService {
    storage: Arc<SeaOrmStorage>,
}

impl PostService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    async fn require_post(&self, id: &str) -> Result<Post, LinkfolioError> {
        self.storage
            .find_post_by_id(id)
            .await?
            .ok_or_else(|| LinkfolioError::not_found(format!("Post not found: {}", id)))
    }

    pub async fn create_post(&self, input: CreatePostInput) -> Result<Post, LinkfolioError> {
        let title = input.title.trim().to_string();
        if title.is_empty() {
            return Err(LinkfolioError::validation("Title is required"));
        }
        if input.content.trim().is_empty() {
            return Err(LinkfolioError::validation("Content is required"));
        }

        let slug = input
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| slugify(&title));
        if slug.is_empty() {
            return Err(LinkfolioError::validation(
                "Cannot derive a slug from the title; provide one",
            ));
        }

        if self.storage.post_slug_taken(&slug, None).await? {
            return Err(LinkfolioError::conflict(format!(
                "Post with slug \"{}\" already exists",
                slug
            )));
        }

        let now = Utc::now();
        let summary = input
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| truncate_chars(&input.content, SUMMARY_CHARS));

        let post = Post {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            slug,
            minute_read: reading_time_minutes(&input.content),
            content: input.content,
            summary,
            author_id: input.author_id,
            category_ids: input.category_ids,
            tag_ids: input.tag_ids,
            post_type: input
                .post_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_POST_TYPE.to_string()),
            cover_image: input
                .cover_image
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_COVER_IMAGE.to_string()),
            gallery: input.gallery,
            status: input.status.unwrap_or(PostStatus::Draft).as_str().to_string(),
            pricing: input
                .pricing
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| "free".to_string()),
            price: input.price,
            access_level: input
                .access_level
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "public".to_string()),
            featured: input.featured,
            views: 0,
            likes: 0,
            date: now,
            created_at: now,
            updated_at: now,
        };

        self.storage.insert_post(&post).await?;
        info!("PostService: created post '{}'", post.slug);
        Ok(post)
    }

    pub async fn list_posts(&self, filter: PostFilter) -> Result<PostPage, LinkfolioError> {
        let page = filter.page.unwrap_or(1).max(1);
        let limit = filter
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let (posts, total) = self.storage.list_posts(&filter, page, limit).await?;
        let total_pages = total.div_ceil(limit);

        Ok(PostPage {
            posts,
            total,
            page,
            total_pages,
            has_more: page < total_pages,
        })
    }

    pub async fn get_post_by_slug(&self, slug: &str) -> Result<Option<Post>, LinkfolioError> {
        self.storage.find_post_by_slug(slug).await
    }

    pub async fn get_post_by_id(&self, id: &str) -> Result<Option<Post>, LinkfolioError> {
        self.storage.find_post_by_id(id).await
    }

    pub async fn update_post(
        &self,
        id: &str,
        input: UpdatePostInput,
    ) -> Result<Post, LinkfolioError> {
        let mut post = self.require_post(id).await?;

        if let Some(slug) = input.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            if self.storage.post_slug_taken(slug, Some(id)).await? {
                return Err(LinkfolioError::conflict(format!(
                    "Post with slug \"{}\" already exists",
                    slug
                )));
            }
            post.slug = slug.to_string();
        }

        if let Some(title) = input.title.filter(|t| !t.trim().is_empty()) {
            post.title = title.trim().to_string();
        }
        if let Some(content) = input.content.filter(|c| !c.is_empty()) {
            post.minute_read = reading_time_minutes(&content);
            post.content = content;
        }
        if let Some(summary) = input.summary {
            post.summary = summary;
        }
        if let Some(author_id) = input.author_id {
            post.author_id = author_id;
        }
        if let Some(ids) = input.category_ids {
            post.category_ids = ids;
        }
        if let Some(ids) = input.tag_ids {
            post.tag_ids = ids;
        }
        if let Some(post_type) = input.post_type {
            post.post_type = post_type;
        }
        if let Some(cover) = input.cover_image {
            post.cover_image = cover;
        }
        if let Some(gallery) = input.gallery {
            post.gallery = gallery;
        }
        if let Some(status) = input.status {
            post.status = status.as_str().to_string();
        }
        if let Some(pricing) = input.pricing {
            post.pricing = pricing;
        }
        if input.price.is_some() {
            post.price = input.price;
        }
        if let Some(access_level) = input.access_level {
            post.access_level = access_level;
        }
        if let Some(featured) = input.featured {
            post.featured = featured;
        }

        post.updated_at = Utc::now();
        self.storage.update_post(&post).await?;
        info!("PostService: updated post '{}'", post.slug);
        Ok(post)
    }

    pub async fn delete_post(&self, id: &str) -> Result<(), LinkfolioError> {
        if !self.storage.delete_post(id).await? {
            return Err(LinkfolioError::not_found(format!("Post not found: {}", id)));
        }
        info!("PostService: deleted post {}", id);
        Ok(())
    }

    async fn set_status(
        &self,
        id: &str,
        status: PostStatus,
        touch_date: bool,
    ) -> Result<Post, LinkfolioError> {
        let mut post = self.require_post(id).await?;
        let now = Utc::now();
        post.status = status.as_str().to_string();
        if touch_date {
            post.date = now;
        }
        post.updated_at = now;
        self.storage.update_post(&post).await?;
        info!("PostService: '{}' -> {}", post.slug, post.status);
        Ok(post)
    }

    /// Status `published`, publication date reset to now
    pub async fn publish_post(&self, id: &str) -> Result<Post, LinkfolioError> {
        self.set_status(id, PostStatus::Published, true).await
    }

    pub async fn unpublish_post(&self, id: &str) -> Result<Post, LinkfolioError> {
        self.set_status(id, PostStatus::Draft, false).await
    }

    pub async fn archive_post(&self, id: &str) -> Result<Post, LinkfolioError> {
        self.set_status(id, PostStatus::Archived, false).await
    }

    pub async fn increment_views(&self, id: &str) -> Result<(), LinkfolioError> {
        if !self
            .storage
            .increment_post_counter(id, PostCounter::Views)
            .await?
        {
            return Err(LinkfolioError::not_found(format!("Post not found: {}", id)));
        }
        Ok(())
    }

    pub async fn increment_likes(&self, id: &str) -> Result<(), LinkfolioError> {
        if !self
            .storage
            .increment_post_counter(id, PostCounter::Likes)
            .await?
        {
            return Err(LinkfolioError::not_found(format!("Post not found: {}", id)));
        }
        Ok(())
    }

    pub async fn post_stats(&self) -> Result<PostStats, LinkfolioError> {
        self.storage.post_stats(None).await
    }

    pub async fn featured_posts(&self, limit: Option<u64>) -> Result<Vec<Post>, LinkfolioError> {
        self.storage
            .featured_posts(limit.unwrap_or(FEATURED_LIMIT))
            .await
    }

    pub async fn popular_posts(&self, limit: Option<u64>) -> Result<Vec<Post>, LinkfolioError> {
        self.storage
            .popular_posts(limit.unwrap_or(POPULAR_LIMIT))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_status_serde() {
        assert_eq!(
            serde_json::to_string(&PostStatus::Published).unwrap(),
            "\"published\""
        );
        let s: PostStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(s, PostStatus::Archived);
        assert_eq!(PostStatus::Draft.as_str(), "draft");
    }

    #[test]
    fn test_create_input_defaults() {
        let input: CreatePostInput =
            serde_json::from_str(r#"{"title":"Hello","content":"World"}"#).unwrap();
        assert!(input.slug.is_none());
        assert!(input.category_ids.is_empty());
        assert!(!input.featured);
        assert!(input.status.is_none());
    }
}
