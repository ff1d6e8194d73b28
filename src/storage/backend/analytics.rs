//! 页面访问统计的数据库查询

use chrono::Utc;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

use super::SeaOrmStorage;
use super::converters::model_to_page_visit;
use crate::errors::{LinkfolioError, Result};
use crate::storage::models::{NewPageVisit, PageCount, PageVisit};

use migration::entities::page_visit;

/// 热门页面查询结果行
#[derive(Debug, FromQueryResult)]
struct PageRow {
    path: String,
    count: i64,
}

#[derive(Debug, FromQueryResult)]
struct UniqueRow {
    unique_visitors: i64,
}

impl SeaOrmStorage {
    pub async fn insert_page_visit(&self, visit: &NewPageVisit) -> Result<PageVisit> {
        let active = page_visit::ActiveModel {
            path: Set(visit.path.clone()),
            referrer: Set(visit.referrer.clone()),
            user_agent: Set(visit.user_agent.clone()),
            ip_hash: Set(visit.ip_hash.clone()),
            country: Set(visit.country.clone()),
            device: Set(visit.device.clone()),
            browser: Set(visit.browser.clone()),
            os: Set(visit.os.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = page_visit::Entity::insert(active)
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("写入访问记录失败: {}", e)))?;
        Ok(model_to_page_visit(model))
    }

    pub async fn count_page_visits(&self) -> Result<u64> {
        Ok(page_visit::Entity::find().count(&self.db).await?)
    }

    /// 不同 ip_hash 的数量
    pub async fn count_unique_visitors(&self) -> Result<u64> {
        let row = page_visit::Entity::find()
            .select_only()
            .column_as(Expr::cust("COUNT(DISTINCT ip_hash)"), "unique_visitors")
            .filter(page_visit::Column::IpHash.is_not_null())
            .into_model::<UniqueRow>()
            .one(&self.db)
            .await?;
        Ok(row.map(|r| r.unique_visitors.max(0) as u64).unwrap_or(0))
    }

    /// 访问量最高的页面
    pub async fn top_pages(&self, limit: u64) -> Result<Vec<PageCount>> {
        let rows = page_visit::Entity::find()
            .select_only()
            .column(page_visit::Column::Path)
            .column_as(page_visit::Column::Id.count(), "count")
            .group_by(page_visit::Column::Path)
            .order_by_desc(Expr::cust("count"))
            .order_by_asc(page_visit::Column::Path)
            .limit(limit)
            .into_model::<PageRow>()
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| PageCount {
                path: r.path,
                count: r.count,
            })
            .collect())
    }

    pub async fn recent_page_visits(&self, limit: u64) -> Result<Vec<PageVisit>> {
        let models = page_visit::Entity::find()
            .order_by_desc(page_visit::Column::CreatedAt)
            .order_by_desc(page_visit::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_page_visit).collect())
    }
}
