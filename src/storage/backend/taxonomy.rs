//! Category and tag persistence

use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ColumnTrait, EntityTrait, ExprTrait, QueryFilter, QueryOrder};

use super::SeaOrmStorage;
use super::converters::{
    category_to_active_model, model_to_category, model_to_tag, tag_to_active_model,
};
use crate::errors::{LinkfolioError, Result};
use crate::storage::models::{Category, Tag};

use migration::entities::{category, tag};

impl SeaOrmStorage {
    // ---------- categories ----------

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_category).collect())
    }

    pub async fn find_category_by_id(&self, id: &str) -> Result<Option<Category>> {
        let model = category::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_category))
    }

    pub async fn find_category_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let model = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_category))
    }

    pub async fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        let model = category::Entity::find()
            .filter(category::Column::Name.eq(name))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_category))
    }

    pub async fn insert_category(&self, c: &Category) -> Result<()> {
        category::Entity::insert(category_to_active_model(c))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("创建分类失败: {}", e)))?;
        Ok(())
    }

    pub async fn update_category(&self, c: &Category) -> Result<()> {
        category::Entity::update(category_to_active_model(c))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("更新分类失败: {}", e)))?;
        Ok(())
    }

    pub async fn delete_category(&self, id: &str) -> Result<bool> {
        let result = category::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    // ---------- tags ----------

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let models = tag::Entity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_tag).collect())
    }

    pub async fn find_tag_by_id(&self, id: &str) -> Result<Option<Tag>> {
        let model = tag::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_tag))
    }

    /// 名称匹配，大小写不敏感
    pub async fn find_tag_by_name(&self, name: &str) -> Result<Option<Tag>> {
        let model = tag::Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(tag::Column::Name))).eq(name.to_lowercase()))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_tag))
    }

    pub async fn insert_tag(&self, t: &Tag) -> Result<()> {
        tag::Entity::insert(tag_to_active_model(t))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("创建标签失败: {}", e)))?;
        Ok(())
    }

    pub async fn update_tag(&self, t: &Tag) -> Result<()> {
        tag::Entity::update(tag_to_active_model(t))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("更新标签失败: {}", e)))?;
        Ok(())
    }

    pub async fn delete_tag(&self, id: &str) -> Result<bool> {
        let result = tag::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
