//! Categories and tags

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::errors::LinkfolioError;
use crate::storage::{Category, SeaOrmStorage, Tag, WithPostCount};
use crate::utils::{generate_prefixed_id, slugify};

const ID_SUFFIX_LEN: usize = 6;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    #[serde(default)]
    pub name: String,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagInput {
    #[serde(default)]
    pub name: String,
}

pub struct TaxonomyService {
    storage: Arc<SeaOrmStorage>,
}

impl TaxonomyService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    // ============ Categories ============

    pub async fn create_category(&self, input: CategoryInput) -> Result<Category, LinkfolioError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(LinkfolioError::validation("Category name is required"));
        }
        let slug = input
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(slugify)
            .unwrap_or_else(|| slugify(&name));
        if slug.is_empty() {
            return Err(LinkfolioError::validation("Category slug is empty"));
        }

        if self.storage.find_category_by_name(&name).await?.is_some()
            || self.storage.find_category_by_slug(&slug).await?.is_some()
        {
            return Err(LinkfolioError::conflict(format!(
                "Category with this name or slug already exists: {}",
                name
            )));
        }

        let category = Category {
            id: uuid::Uuid::new_v4().to_string(),
            cat_id: generate_prefixed_id("cat", ID_SUFFIX_LEN),
            name,
            slug,
            created_at: Utc::now(),
        };
        self.storage.insert_category(&category).await?;
        info!("TaxonomyService: created category '{}'", category.slug);
        Ok(category)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, LinkfolioError> {
        self.storage.list_categories().await
    }

    pub async fn get_category(&self, id: &str) -> Result<Option<Category>, LinkfolioError> {
        self.storage.find_category_by_id(id).await
    }

    pub async fn get_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<Category>, LinkfolioError> {
        self.storage.find_category_by_slug(slug).await
    }

    pub async fn update_category(
        &self,
        id: &str,
        input: CategoryInput,
    ) -> Result<Category, LinkfolioError> {
        let mut category = self
            .storage
            .find_category_by_id(id)
            .await?
            .ok_or_else(|| LinkfolioError::not_found(format!("Category not found: {}", id)))?;

        let name = input.name.trim();
        if !name.is_empty() {
            category.name = name.to_string();
        }

        if let Some(slug) = input
            .slug
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(slugify)
        {
            if let Some(existing) = self.storage.find_category_by_slug(&slug).await?
                && existing.id != category.id
            {
                return Err(LinkfolioError::conflict(format!(
                    "Category slug already in use: {}",
                    slug
                )));
            }
            category.slug = slug;
        }

        self.storage.update_category(&category).await?;
        info!("TaxonomyService: updated category '{}'", category.slug);
        Ok(category)
    }

    pub async fn delete_category(&self, id: &str) -> Result<(), LinkfolioError> {
        if !self.storage.delete_category(id).await? {
            return Err(LinkfolioError::not_found(format!(
                "Category not found: {}",
                id
            )));
        }
        info!("TaxonomyService: deleted category {}", id);
        Ok(())
    }

    /// Posts reference categories by row id
    pub async fn categories_with_counts(
        &self,
    ) -> Result<Vec<WithPostCount<Category>>, LinkfolioError> {
        let categories = self.storage.list_categories().await?;
        let mut result = Vec::with_capacity(categories.len());
        for category in categories {
            let post_count = self.storage.count_posts_in_category(&category.id).await?;
            result.push(WithPostCount {
                item: category,
                post_count,
            });
        }
        Ok(result)
    }

    // ============ Tags ============

    pub async fn create_tag(&self, input: TagInput) -> Result<Tag, LinkfolioError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(LinkfolioError::validation("Tag name is required"));
        }
        if self.storage.find_tag_by_name(&name).await?.is_some() {
            return Err(LinkfolioError::conflict(format!(
                "Tag already exists: {}",
                name
            )));
        }
        self.insert_tag(name).await
    }

    async fn insert_tag(&self, name: String) -> Result<Tag, LinkfolioError> {
        let tag = Tag {
            id: uuid::Uuid::new_v4().to_string(),
            tag_id: generate_prefixed_id("tag", ID_SUFFIX_LEN),
            name,
            created_at: Utc::now(),
        };
        self.storage.insert_tag(&tag).await?;
        info!("TaxonomyService: created tag '{}'", tag.name);
        Ok(tag)
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, LinkfolioError> {
        self.storage.list_tags().await
    }

    pub async fn get_tag(&self, id: &str) -> Result<Option<Tag>, LinkfolioError> {
        self.storage.find_tag_by_id(id).await
    }

    /// Case-insensitive
    pub async fn get_tag_by_name(&self, name: &str) -> Result<Option<Tag>, LinkfolioError> {
        self.storage.find_tag_by_name(name.trim()).await
    }

    pub async fn update_tag(&self, id: &str, input: TagInput) -> Result<Tag, LinkfolioError> {
        let mut tag = self
            .storage
            .find_tag_by_id(id)
            .await?
            .ok_or_else(|| LinkfolioError::not_found(format!("Tag not found: {}", id)))?;

        let name = input.name.trim();
        if name.is_empty() {
            return Err(LinkfolioError::validation("Tag name is required"));
        }
        if let Some(existing) = self.storage.find_tag_by_name(name).await?
            && existing.id != tag.id
        {
            return Err(LinkfolioError::conflict(format!(
                "Tag already exists: {}",
                name
            )));
        }

        tag.name = name.to_string();
        self.storage.update_tag(&tag).await?;
        Ok(tag)
    }

    pub async fn delete_tag(&self, id: &str) -> Result<(), LinkfolioError> {
        if !self.storage.delete_tag(id).await? {
            return Err(LinkfolioError::not_found(format!("Tag not found: {}", id)));
        }
        info!("TaxonomyService: deleted tag {}", id);
        Ok(())
    }

    pub async fn tags_with_counts(&self) -> Result<Vec<WithPostCount<Tag>>, LinkfolioError> {
        let tags = self.storage.list_tags().await?;
        let mut result = Vec::with_capacity(tags.len());
        for tag in tags {
            let post_count = self.storage.count_posts_with_tag(&tag.id).await?;
            result.push(WithPostCount {
                item: tag,
                post_count,
            });
        }
        Ok(result)
    }

    pub async fn get_or_create_tag(&self, name: &str) -> Result<Tag, LinkfolioError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LinkfolioError::validation("Tag name is required"));
        }
        if let Some(tag) = self.storage.find_tag_by_name(name).await? {
            return Ok(tag);
        }
        self.insert_tag(name.to_string()).await
    }

    /// Blank names are skipped; duplicates in the input resolve to one tag
    pub async fn get_or_create_tags(&self, names: &[String]) -> Result<Vec<Tag>, LinkfolioError> {
        let mut tags: Vec<Tag> = Vec::with_capacity(names.len());
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            let tag = self.get_or_create_tag(name).await?;
            if !tags.iter().any(|t| t.id == tag.id) {
                tags.push(tag);
            }
        }
        Ok(tags)
    }
}
