//! 站点访问统计端点

use actix_web::{Responder, Result as ActixResult, web};

use crate::services::AnalyticsService;

use super::helpers::api_result;

/// GET /analytics：总访问、独立访客、热门页面、最近访问
pub async fn analytics_summary(
    analytics: web::Data<AnalyticsService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(analytics.summary().await))
}
