use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::SeaOrmStorage;
use super::converters::{model_to_resume, resume_to_active_model};
use crate::errors::{LinkfolioError, Result};
use crate::storage::models::Resume;

use migration::entities::resume;

impl SeaOrmStorage {
    /// 简历列表（标题升序）
    pub async fn list_resumes(&self) -> Result<Vec<Resume>> {
        let models = resume::Entity::find()
            .order_by_asc(resume::Column::Title)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_resume).collect())
    }

    pub async fn find_resume_by_id(&self, id: &str) -> Result<Option<Resume>> {
        let model = resume::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_resume))
    }

    pub async fn find_active_resume(&self) -> Result<Option<Resume>> {
        let model = resume::Entity::find()
            .filter(resume::Column::IsActive.eq(true))
            .order_by_asc(resume::Column::Order)
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_resume))
    }

    pub async fn insert_resume(&self, r: &Resume) -> Result<()> {
        resume::Entity::insert(resume_to_active_model(r, true))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("创建简历失败: {}", e)))?;
        Ok(())
    }

    pub async fn update_resume(&self, r: &Resume) -> Result<()> {
        resume::Entity::update(resume_to_active_model(r, false))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("更新简历失败: {}", e)))?;
        Ok(())
    }

    pub async fn delete_resume(&self, id: &str) -> Result<bool> {
        let result = resume::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    /// 停用除 keep_id 以外的全部简历
    pub async fn deactivate_other_resumes(&self, keep_id: &str) -> Result<u64> {
        let result = resume::Entity::update_many()
            .col_expr(resume::Column::IsActive, Expr::value(false))
            .filter(resume::Column::Id.ne(keep_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
