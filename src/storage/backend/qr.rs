//! QR code and scan persistence

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, ExprTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use tracing::debug;

use super::converters::{model_to_qr_code, model_to_qr_scan, qr_code_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::errors::{LinkfolioError, Result};
use crate::storage::models::{QrCode, QrScan, ScanMetadata};

use migration::entities::{qr_code, qr_scan};

impl SeaOrmStorage {
    pub async fn insert_qr_code(&self, qr: &QrCode) -> Result<()> {
        qr_code::Entity::insert(qr_code_to_active_model(qr))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("创建二维码失败: {}", e)))?;
        Ok(())
    }

    /// 按公开标识查找（不区分是否激活）
    pub async fn find_qr_by_qr_id(&self, qr_id: &str) -> Result<Option<QrCode>> {
        let db = &self.db;
        let qr_id_owned = qr_id.to_string();

        let model = retry::with_retry(
            &format!("find_qr_by_qr_id({})", qr_id),
            self.retry_config,
            || async {
                qr_code::Entity::find()
                    .filter(qr_code::Column::QrId.eq(qr_id_owned.as_str()))
                    .one(db)
                    .await
            },
        )
        .await?;

        Ok(model.map(model_to_qr_code))
    }

    pub async fn find_qr_by_id(&self, id: &str) -> Result<Option<QrCode>> {
        let model = qr_code::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_qr_code))
    }

    /// 某个主页当前激活的二维码（多条时取最新）
    pub async fn find_active_qr(&self, profile_id: &str) -> Result<Option<QrCode>> {
        let model = qr_code::Entity::find()
            .filter(qr_code::Column::ProfileId.eq(profile_id))
            .filter(qr_code::Column::IsActive.eq(true))
            .order_by_desc(qr_code::Column::CreatedAt)
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_qr_code))
    }

    /// 停用主页下所有激活的二维码，返回受影响行数
    pub async fn deactivate_profile_qrs(&self, profile_id: &str) -> Result<u64> {
        let result = qr_code::Entity::update_many()
            .col_expr(qr_code::Column::IsActive, Expr::value(false))
            .col_expr(qr_code::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(qr_code::Column::ProfileId.eq(profile_id))
            .filter(qr_code::Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("停用二维码失败: {}", e)))?;
        Ok(result.rows_affected)
    }

    pub async fn set_qr_code_url(&self, id: &str, url: &str) -> Result<()> {
        let result = qr_code::Entity::update_many()
            .col_expr(qr_code::Column::QrCodeUrl, Expr::value(url))
            .col_expr(qr_code::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(qr_code::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(LinkfolioError::not_found(format!("QR code not found: {}", id)));
        }
        Ok(())
    }

    /// 写入一条扫码记录
    pub async fn insert_scan(
        &self,
        qr_code_id: &str,
        session_id: &str,
        meta: &ScanMetadata,
    ) -> Result<QrScan> {
        let active = qr_scan::ActiveModel {
            qr_code_id: Set(qr_code_id.to_string()),
            session_id: Set(session_id.to_string()),
            ip_hash: Set(meta.ip_hash.clone()),
            user_agent: Set(meta.user_agent.clone()),
            device: Set(meta.device.clone()),
            browser: Set(meta.browser.clone()),
            os: Set(meta.os.clone()),
            country: Set(meta.country.clone()),
            referrer: Set(meta.referrer.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let db = &self.db;
        let model = retry::with_write_retry("insert_scan", self.retry_config, || async {
            qr_scan::Entity::insert(active.clone())
                .exec_with_returning(db)
                .await
        })
        .await
        .map_err(|e| LinkfolioError::database_operation(format!("写入扫码记录失败: {}", e)))?;

        Ok(model_to_qr_scan(model))
    }

    /// total_scans = total_scans + 1（单条 UPDATE，不读后写）
    pub async fn increment_scan_count(&self, qr_code_id: &str) -> Result<()> {
        let stmt = Query::update()
            .table(qr_code::Entity)
            .value(
                qr_code::Column::TotalScans,
                Expr::col(qr_code::Column::TotalScans).add(Expr::val(1i64)),
            )
            .and_where(Expr::col(qr_code::Column::Id).eq(Expr::val(qr_code_id)))
            .to_owned();

        let db = &self.db;
        let stmt_ref = &stmt;
        let result = retry::with_write_retry("increment_scan_count", self.retry_config, || async {
            db.execute(stmt_ref).await
        })
        .await
        .map_err(|e| LinkfolioError::database_operation(format!("更新扫码计数失败: {}", e)))?;

        debug!(
            "Scan counter incremented for {} ({} rows)",
            qr_code_id,
            result.rows_affected()
        );
        Ok(())
    }

    /// 最近的扫码记录（新的在前）
    pub async fn recent_scans(&self, qr_code_id: &str, limit: u64) -> Result<Vec<QrScan>> {
        let models = qr_scan::Entity::find()
            .filter(qr_scan::Column::QrCodeId.eq(qr_code_id))
            .order_by_desc(qr_scan::Column::CreatedAt)
            .order_by_desc(qr_scan::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_qr_scan).collect())
    }

    pub async fn count_scans_since(&self, qr_code_id: &str, since: DateTime<Utc>) -> Result<u64> {
        let count = qr_scan::Entity::find()
            .filter(qr_scan::Column::QrCodeId.eq(qr_code_id))
            .filter(qr_scan::Column::CreatedAt.gte(since))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
