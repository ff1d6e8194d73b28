//! Linktree 主页管理端点

use actix_web::{Responder, Result as ActixResult, web};
use tracing::info;

use crate::services::{ProfileService, ProfileUpdate};

use super::helpers::{api_result, error_from_linkfolio};

/// GET /profile
pub async fn get_profile(profiles: web::Data<ProfileService>) -> ActixResult<impl Responder> {
    Ok(api_result(profiles.get_profile().await))
}

/// PUT /profile，请求体带 `section` 字段
pub async fn update_profile(
    profiles: web::Data<ProfileService>,
    body: web::Json<ProfileUpdate>,
) -> ActixResult<impl Responder> {
    let profile = match profiles.get_profile().await {
        Ok(p) => p,
        Err(e) => return Ok(error_from_linkfolio(&e)),
    };
    info!("Admin API: update profile section {}", body.section_name());
    Ok(api_result(
        profiles.update_profile(&profile.id, body.into_inner()).await,
    ))
}

/// POST /profile/short-code
pub async fn regenerate_short_code(
    profiles: web::Data<ProfileService>,
) -> ActixResult<impl Responder> {
    let profile = match profiles.get_profile().await {
        Ok(p) => p,
        Err(e) => return Ok(error_from_linkfolio(&e)),
    };
    Ok(api_result(profiles.regenerate_short_code(&profile.id).await))
}
