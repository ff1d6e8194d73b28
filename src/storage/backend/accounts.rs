//! Admin and author accounts

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

use super::SeaOrmStorage;
use super::converters::{
    admin_to_active_model, author_to_active_model, model_to_admin, model_to_author,
};
use crate::errors::{LinkfolioError, Result};
use crate::storage::models::{Admin, Author};

use migration::entities::{admin, author};

impl SeaOrmStorage {
    pub async fn count_admins(&self) -> Result<u64> {
        Ok(admin::Entity::find().count(&self.db).await?)
    }

    pub async fn find_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let model = admin::Entity::find()
            .filter(admin::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_admin))
    }

    pub async fn find_admin_by_id(&self, id: &str) -> Result<Option<Admin>> {
        let model = admin::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_admin))
    }

    pub async fn insert_admin(&self, a: &Admin) -> Result<()> {
        admin::Entity::insert(admin_to_active_model(a, true))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("创建管理员失败: {}", e)))?;
        Ok(())
    }

    pub async fn update_admin(&self, a: &Admin) -> Result<()> {
        admin::Entity::update(admin_to_active_model(a, false))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("更新管理员失败: {}", e)))?;
        Ok(())
    }

    pub async fn list_authors(&self) -> Result<Vec<Author>> {
        let models = author::Entity::find()
            .order_by_desc(author::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_author).collect())
    }

    pub async fn find_author_by_id(&self, id: &str) -> Result<Option<Author>> {
        let model = author::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_author))
    }

    pub async fn find_author_by_username(&self, username: &str) -> Result<Option<Author>> {
        let model = author::Entity::find()
            .filter(author::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_author))
    }

    pub async fn insert_author(&self, a: &Author) -> Result<()> {
        author::Entity::insert(author_to_active_model(a, true))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("创建作者失败: {}", e)))?;
        Ok(())
    }

    pub async fn update_author(&self, a: &Author) -> Result<()> {
        author::Entity::update(author_to_active_model(a, false))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("更新作者失败: {}", e)))?;
        Ok(())
    }

    /// 只更新密码列
    pub async fn set_author_password(
        &self,
        id: &str,
        password_hash: &str,
        must_change: bool,
    ) -> Result<bool> {
        let result = author::Entity::update_many()
            .col_expr(author::Column::Password, Expr::value(password_hash))
            .col_expr(author::Column::MustChangePassword, Expr::value(must_change))
            .col_expr(author::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
            .filter(author::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_author(&self, id: &str) -> Result<bool> {
        let result = author::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
