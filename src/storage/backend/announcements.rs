use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::SeaOrmStorage;
use super::converters::{announcement_to_active_model, model_to_announcement};
use crate::errors::{LinkfolioError, Result};
use crate::storage::models::Announcement;

use migration::entities::announcement;

impl SeaOrmStorage {
    /// 激活的公告，可按 slot 过滤（order 升序）
    pub async fn list_active_announcements(&self, slot: Option<&str>) -> Result<Vec<Announcement>> {
        let mut query = announcement::Entity::find().filter(announcement::Column::IsActive.eq(true));
        if let Some(slot) = slot {
            query = query.filter(announcement::Column::Slot.eq(slot));
        }
        let models = query
            .order_by_asc(announcement::Column::Order)
            .order_by_asc(announcement::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_announcement).collect())
    }

    /// 全部公告（slot、order 升序），可按 slot 过滤
    pub async fn list_announcements(&self, slot: Option<&str>) -> Result<Vec<Announcement>> {
        let mut query = announcement::Entity::find();
        if let Some(slot) = slot {
            query = query.filter(announcement::Column::Slot.eq(slot));
        }
        let models = query
            .order_by_asc(announcement::Column::Slot)
            .order_by_asc(announcement::Column::Order)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_announcement).collect())
    }

    pub async fn find_announcement_by_id(&self, id: &str) -> Result<Option<Announcement>> {
        let model = announcement::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_announcement))
    }

    pub async fn insert_announcement(&self, a: &Announcement) -> Result<()> {
        announcement::Entity::insert(announcement_to_active_model(a, true))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("创建公告失败: {}", e)))?;
        Ok(())
    }

    pub async fn update_announcement(&self, a: &Announcement) -> Result<()> {
        announcement::Entity::update(announcement_to_active_model(a, false))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("更新公告失败: {}", e)))?;
        Ok(())
    }

    pub async fn delete_announcement(&self, id: &str) -> Result<bool> {
        let result = announcement::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
