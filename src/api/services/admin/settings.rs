//! 站点设置端点

use actix_web::{Responder, Result as ActixResult, web};

use crate::services::SiteSettingsStore;

use super::helpers::{api_result, success_response};

/// GET /settings
pub async fn get_settings(settings: web::Data<SiteSettingsStore>) -> ActixResult<impl Responder> {
    Ok(success_response(settings.get().await))
}

/// PUT /settings：顶层字段浅合并
pub async fn update_settings(
    settings: web::Data<SiteSettingsStore>,
    body: web::Json<serde_json::Value>,
) -> ActixResult<impl Responder> {
    Ok(api_result(settings.update(body.into_inner()).await))
}
