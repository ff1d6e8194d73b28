//! Admin and author accounts
//!
//! Passwords are stored as Argon2id PHC strings. Authors created by an admin
//! get a temporary password that must be changed on first login.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::AdminConfig;
use crate::errors::LinkfolioError;
use crate::storage::{Admin, Author, AuthorStats, PostFilter, SeaOrmStorage};
use crate::utils::generate_from_alphabet;
use crate::utils::password::{
    generate_temporary_password, hash_password, is_argon2_hash, verify_password,
};

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_AUTHOR: &str = "author";
pub const ROLE_SUPERADMIN: &str = "superadmin";
const MIN_PASSWORD_LEN: usize = 8;

/// `author_{millis}_{9 chars}`
fn generate_author_id() -> String {
    format!(
        "author_{}_{}",
        Utc::now().timestamp_millis(),
        generate_from_alphabet(b"abcdefghijklmnopqrstuvwxyz0123456789", 9)
    )
}

fn normalize_author_role(role: Option<&str>) -> Result<String, LinkfolioError> {
    match role.map(str::trim).filter(|r| !r.is_empty()) {
        None | Some(ROLE_AUTHOR) => Ok(ROLE_AUTHOR.to_string()),
        Some(ROLE_SUPERADMIN) => Ok(ROLE_SUPERADMIN.to_string()),
        Some(other) => Err(LinkfolioError::validation(format!(
            "Invalid author role: {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAuthorInput {
    pub username: String,
    pub email: Option<String>,
    pub author_name: String,
    pub role: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAuthorInput {
    pub author_name: Option<String>,
    pub email: Option<String>,
    pub author_profession: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
    pub role: Option<String>,
}

/// A new author together with the plaintext password, shown once
#[derive(Debug, Clone)]
pub struct CreatedAuthor {
    pub author: Author,
    pub temporary_password: String,
}

pub struct AccountService {
    storage: Arc<SeaOrmStorage>,
}

impl AccountService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    // ============ Admins ============

    /// Seed the first admin when the table is empty
    pub async fn ensure_admin_exists(&self, config: &AdminConfig) -> Result<(), LinkfolioError> {
        if self.storage.count_admins().await? > 0 {
            return Ok(());
        }

        // 配置里可直接写 Argon2 哈希
        let password = if is_argon2_hash(&config.default_password) {
            config.default_password.clone()
        } else {
            hash_password(&config.default_password)?
        };

        let admin = Admin {
            id: uuid::Uuid::new_v4().to_string(),
            username: config.default_username.clone(),
            password,
            email: Some(config.default_email.clone()).filter(|e| !e.is_empty()),
            role: ROLE_ADMIN.to_string(),
            created_at: Utc::now(),
        };
        self.storage.insert_admin(&admin).await?;

        if config.default_password == "admin" {
            warn!(
                "Created admin '{}' with the default password; change it with `reset-admin-password`",
                admin.username
            );
        } else {
            info!("Created admin '{}'", admin.username);
        }
        Ok(())
    }

    /// Returns the admin when the credentials match
    pub async fn authenticate_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Admin>, LinkfolioError> {
        let Some(admin) = self.storage.find_admin_by_username(username).await? else {
            return Ok(None);
        };
        if verify_password(password, &admin.password)? {
            Ok(Some(admin))
        } else {
            Ok(None)
        }
    }

    pub async fn get_admin(&self, id: &str) -> Result<Option<Admin>, LinkfolioError> {
        self.storage.find_admin_by_id(id).await
    }

    pub async fn get_admin_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Admin>, LinkfolioError> {
        self.storage.find_admin_by_username(username).await
    }

    /// A supplied password is re-hashed
    pub async fn update_admin(&self, id: &str, update: AdminUpdate) -> Result<Admin, LinkfolioError> {
        let mut admin = self
            .storage
            .find_admin_by_id(id)
            .await?
            .ok_or_else(|| LinkfolioError::not_found(format!("Admin not found: {}", id)))?;

        if let Some(username) = update.username.filter(|u| !u.trim().is_empty()) {
            admin.username = username.trim().to_string();
        }
        if let Some(email) = update.email {
            admin.email = Some(email).filter(|e| !e.is_empty());
        }
        if let Some(password) = update.password.filter(|p| !p.is_empty()) {
            admin.password = hash_password(&password)?;
        }

        self.storage.update_admin(&admin).await?;
        info!("AccountService: admin '{}' updated", admin.username);
        Ok(admin)
    }

    // ============ Authors ============

    pub async fn create_author(
        &self,
        input: CreateAuthorInput,
    ) -> Result<CreatedAuthor, LinkfolioError> {
        let username = input.username.trim().to_string();
        let author_name = input.author_name.trim().to_string();
        if username.is_empty() || author_name.is_empty() {
            return Err(LinkfolioError::validation(
                "Username and author name are required",
            ));
        }
        if self.storage.find_author_by_username(&username).await?.is_some() {
            return Err(LinkfolioError::conflict(format!(
                "Username already taken: {}",
                username
            )));
        }

        let role = normalize_author_role(input.role.as_deref())?;
        let temporary_password = input
            .password
            .filter(|p| !p.is_empty())
            .unwrap_or_else(generate_temporary_password);

        let now = Utc::now();
        let author = Author {
            id: uuid::Uuid::new_v4().to_string(),
            author_id: generate_author_id(),
            username,
            email: input.email.filter(|e| !e.is_empty()),
            author_name,
            author_profession: None,
            description: None,
            avatar: None,
            linkedin: None,
            github: None,
            twitter: None,
            website: None,
            password: hash_password(&temporary_password)?,
            role,
            must_change_password: true,
            created_at: now,
            updated_at: now,
        };

        self.storage.insert_author(&author).await?;
        info!(
            "AccountService: created author '{}' ({})",
            author.username, author.role
        );
        Ok(CreatedAuthor {
            author,
            temporary_password,
        })
    }

    /// Newest first
    pub async fn list_authors(&self) -> Result<Vec<Author>, LinkfolioError> {
        self.storage.list_authors().await
    }

    pub async fn get_author(&self, id: &str) -> Result<Option<Author>, LinkfolioError> {
        self.storage.find_author_by_id(id).await
    }

    pub async fn get_author_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Author>, LinkfolioError> {
        self.storage.find_author_by_username(username).await
    }

    pub async fn authenticate_author(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Author>, LinkfolioError> {
        let Some(author) = self.storage.find_author_by_username(username).await? else {
            return Ok(None);
        };
        if verify_password(password, &author.password)? {
            Ok(Some(author))
        } else {
            Ok(None)
        }
    }

    pub async fn update_author(
        &self,
        id: &str,
        input: UpdateAuthorInput,
    ) -> Result<Author, LinkfolioError> {
        let mut author = self
            .storage
            .find_author_by_id(id)
            .await?
            .ok_or_else(|| LinkfolioError::not_found(format!("Author not found: {}", id)))?;

        if let Some(name) = input.author_name.filter(|n| !n.trim().is_empty()) {
            author.author_name = name.trim().to_string();
        }
        if let Some(role) = input.role {
            author.role = normalize_author_role(Some(&role))?;
        }

        let optional_fields = [
            (&mut author.email, input.email),
            (&mut author.author_profession, input.author_profession),
            (&mut author.description, input.description),
            (&mut author.avatar, input.avatar),
            (&mut author.linkedin, input.linkedin),
            (&mut author.github, input.github),
            (&mut author.twitter, input.twitter),
            (&mut author.website, input.website),
        ];
        for (field, value) in optional_fields {
            if let Some(value) = value {
                // 空字符串表示清空
                *field = Some(value).filter(|v| !v.is_empty());
            }
        }

        author.updated_at = Utc::now();
        self.storage.update_author(&author).await?;
        Ok(author)
    }

    pub async fn update_author_password(
        &self,
        id: &str,
        new_password: &str,
        must_change: bool,
    ) -> Result<(), LinkfolioError> {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(LinkfolioError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let hash = hash_password(new_password)?;
        if !self
            .storage
            .set_author_password(id, &hash, must_change)
            .await?
        {
            return Err(LinkfolioError::not_found(format!("Author not found: {}", id)));
        }
        info!("AccountService: password updated for author {}", id);
        Ok(())
    }

    /// Author-initiated change; the current password must match
    pub async fn change_author_password(
        &self,
        id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), LinkfolioError> {
        let author = self
            .storage
            .find_author_by_id(id)
            .await?
            .ok_or_else(|| LinkfolioError::not_found(format!("Author not found: {}", id)))?;
        if !verify_password(current_password, &author.password)? {
            return Err(LinkfolioError::unauthorized("Current password is incorrect"));
        }
        self.update_author_password(id, new_password, false).await
    }

    /// New temporary password; the author must change it on next login
    pub async fn reset_author_password(&self, id: &str) -> Result<String, LinkfolioError> {
        let password = generate_temporary_password();
        self.update_author_password(id, &password, true).await?;
        Ok(password)
    }

    pub async fn delete_author(&self, id: &str) -> Result<(), LinkfolioError> {
        if !self.storage.delete_author(id).await? {
            return Err(LinkfolioError::not_found(format!("Author not found: {}", id)));
        }
        info!("AccountService: deleted author {}", id);
        Ok(())
    }

    pub async fn author_stats(&self, id: &str) -> Result<AuthorStats, LinkfolioError> {
        let stats = self.storage.post_stats(Some(id)).await?;
        Ok(AuthorStats {
            total_posts: stats.total,
            published_posts: stats.published,
            draft_posts: stats.drafts,
        })
    }

    /// Filter restricted to the author's own posts
    pub fn own_posts_filter(author_id: &str, mut filter: PostFilter) -> PostFilter {
        filter.author_id = Some(author_id.to_string());
        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_author_id_shape() {
        let id = generate_author_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "author");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
    }

    #[test]
    fn test_normalize_author_role() {
        assert_eq!(normalize_author_role(None).unwrap(), ROLE_AUTHOR);
        assert_eq!(normalize_author_role(Some("")).unwrap(), ROLE_AUTHOR);
        assert_eq!(
            normalize_author_role(Some("superadmin")).unwrap(),
            ROLE_SUPERADMIN
        );
        assert!(normalize_author_role(Some("root")).is_err());
    }

    #[test]
    fn test_own_posts_filter_overrides_author() {
        let filter = PostFilter {
            author_id: Some("someone-else".to_string()),
            ..Default::default()
        };
        let filter = AccountService::own_posts_filter("me", filter);
        assert_eq!(filter.author_id.as_deref(), Some("me"));
    }
}
