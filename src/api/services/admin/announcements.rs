//! 公告与首页卡片管理端点

use actix_web::{Responder, Result as ActixResult, web};

use crate::services::{AnnouncementInput, AnnouncementService};

use super::helpers::{api_deleted, api_found, api_result, created_response, error_from_linkfolio};

// ============ 公告 ============

/// GET /announcements（slot、order 升序）
pub async fn list_announcements(
    announcements: web::Data<AnnouncementService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(announcements.list_all().await))
}

pub async fn get_announcement(
    announcements: web::Data<AnnouncementService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_found(
        announcements.get(&path.into_inner()).await,
        "Announcement",
    ))
}

pub async fn create_announcement(
    announcements: web::Data<AnnouncementService>,
    body: web::Json<AnnouncementInput>,
) -> ActixResult<impl Responder> {
    match announcements.create(body.into_inner()).await {
        Ok(a) => Ok(created_response(a)),
        Err(e) => Ok(error_from_linkfolio(&e)),
    }
}

pub async fn update_announcement(
    announcements: web::Data<AnnouncementService>,
    path: web::Path<String>,
    body: web::Json<AnnouncementInput>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        announcements
            .update(&path.into_inner(), body.into_inner())
            .await,
    ))
}

pub async fn delete_announcement(
    announcements: web::Data<AnnouncementService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_deleted(
        announcements.delete(&path.into_inner()).await,
        "Announcement",
    ))
}

/// POST /announcements/{id}/toggle
pub async fn toggle_announcement(
    announcements: web::Data<AnnouncementService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        announcements.toggle_active(&path.into_inner()).await,
    ))
}

// ============ 首页卡片 ============

pub async fn list_homepage_cards(
    announcements: web::Data<AnnouncementService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(announcements.homepage_cards().await))
}

pub async fn create_homepage_card(
    announcements: web::Data<AnnouncementService>,
    body: web::Json<AnnouncementInput>,
) -> ActixResult<impl Responder> {
    match announcements.create_homepage_card(body.into_inner()).await {
        Ok(card) => Ok(created_response(card)),
        Err(e) => Ok(error_from_linkfolio(&e)),
    }
}

pub async fn update_homepage_card(
    announcements: web::Data<AnnouncementService>,
    path: web::Path<String>,
    body: web::Json<AnnouncementInput>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        announcements
            .update_homepage_card(&path.into_inner(), body.into_inner())
            .await,
    ))
}
