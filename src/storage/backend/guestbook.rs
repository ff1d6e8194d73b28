use sea_orm::sea_query::Expr;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use super::SeaOrmStorage;
use super::converters::model_to_guestbook_entry;
use crate::errors::{LinkfolioError, Result};
use crate::storage::models::GuestbookEntry;

use migration::entities::guestbook_entry;

impl SeaOrmStorage {
    /// 留言列表（新的在前），approved 为 None 时不过滤
    pub async fn list_guestbook_entries(
        &self,
        approved: Option<bool>,
        limit: Option<u64>,
    ) -> Result<Vec<GuestbookEntry>> {
        let mut query = guestbook_entry::Entity::find();
        if let Some(approved) = approved {
            query = query.filter(guestbook_entry::Column::Approved.eq(approved));
        }

        let models = query
            .order_by_desc(guestbook_entry::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_guestbook_entry).collect())
    }

    pub async fn insert_guestbook_entry(&self, entry: &GuestbookEntry) -> Result<()> {
        let active = guestbook_entry::ActiveModel {
            id: Set(entry.id.clone()),
            author: Set(entry.author.clone()),
            content: Set(entry.content.clone()),
            approved: Set(entry.approved),
            created_at: Set(entry.created_at),
        };
        guestbook_entry::Entity::insert(active)
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("写入留言失败: {}", e)))?;
        Ok(())
    }

    pub async fn approve_guestbook_entry(&self, id: &str) -> Result<bool> {
        let result = guestbook_entry::Entity::update_many()
            .col_expr(guestbook_entry::Column::Approved, Expr::value(true))
            .filter(guestbook_entry::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn delete_guestbook_entry(&self, id: &str) -> Result<bool> {
        let result = guestbook_entry::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
