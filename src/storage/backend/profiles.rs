use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::SeaOrmStorage;
use super::converters::{model_to_profile, profile_to_active_model};
use crate::errors::{LinkfolioError, Result};
use crate::storage::models::Profile;

use migration::entities::profile;

impl SeaOrmStorage {
    /// 第一个激活的主页（最早创建）
    pub async fn find_active_profile(&self) -> Result<Option<Profile>> {
        let model = profile::Entity::find()
            .filter(profile::Column::IsActive.eq(true))
            .order_by_asc(profile::Column::CreatedAt)
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_profile))
    }

    pub async fn find_profile_by_id(&self, id: &str) -> Result<Option<Profile>> {
        let model = profile::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_profile))
    }

    pub async fn find_profile_by_short_code(&self, short_code: &str) -> Result<Option<Profile>> {
        let model = profile::Entity::find()
            .filter(profile::Column::ShortCode.eq(short_code))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_profile))
    }

    pub async fn insert_profile(&self, p: &Profile) -> Result<()> {
        profile::Entity::insert(profile_to_active_model(p, true))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("创建主页失败: {}", e)))?;
        Ok(())
    }

    pub async fn update_profile(&self, p: &Profile) -> Result<()> {
        profile::Entity::update(profile_to_active_model(p, false))
            .exec(&self.db)
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotUpdated => {
                    LinkfolioError::not_found(format!("Profile not found: {}", p.id))
                }
                other => LinkfolioError::database_operation(format!("更新主页失败: {}", other)),
            })?;
        Ok(())
    }
}
