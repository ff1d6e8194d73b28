//! Admin API 路由配置
//!
//! 将 /v1 下的路由按功能模块拆分，提高可读性和可维护性。

use actix_web::dev::HttpServiceFactory;
use actix_web::guard::{self, GuardContext};
use actix_web::http::header;
use actix_web::web;

use crate::api::middleware::JwtAuth;

use super::analytics::analytics_summary;
use super::announcements::{
    create_announcement, create_homepage_card, delete_announcement, get_announcement,
    list_announcements, list_homepage_cards, toggle_announcement, update_announcement,
    update_homepage_card,
};
use super::auth::{
    login, login_rate_limiter, logout, refresh_rate_limiter, refresh_token, update_me,
    verify_token,
};
use super::authors::{
    create_author, delete_author, get_author, get_author_stats, list_authors,
    reset_author_password, set_author_password, update_author,
};
use super::guestbook::{approve_entry, delete_entry, list_entries};
use super::posts::{
    archive_post, create_post, delete_post, featured_posts, get_post, list_posts, popular_posts,
    post_stats, publish_post, unpublish_post, update_post,
};
use super::profile::{get_profile, regenerate_short_code, update_profile};
use super::qr::{
    get_qr_image, get_qr_overview, get_qr_scans, get_qr_stats, post_qr_action, post_qr_upload,
};
use super::resumes::{
    activate_resume, create_resume, delete_resume, get_resume, get_resume_qr, list_resumes,
    update_resume, upload_resume_pdf,
};
use super::settings::{get_settings, update_settings};
use super::taxonomy::{
    create_category, create_tag, delete_category, delete_tag, get_category, get_tag,
    list_categories, list_tags, update_category, update_tag,
};

/// 请求体是否为 multipart/form-data
pub fn is_multipart(ctx: &GuardContext) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
}

/// 认证路由 `/auth`
///
/// 包含：
/// - POST /auth/login - 登录（带限流）
/// - POST /auth/refresh - 刷新 token（带限流）
/// - POST /auth/logout - 登出
/// - GET /auth/verify - 验证 token
/// - PUT /auth/me - 修改当前管理员
pub fn auth_routes() -> actix_web::Scope {
    web::scope("/auth")
        .route("/login", web::post().to(login).wrap(login_rate_limiter()))
        .route(
            "/refresh",
            web::post().to(refresh_token).wrap(refresh_rate_limiter()),
        )
        .route("/logout", web::post().to(logout))
        .route("/verify", web::get().to(verify_token))
        .route("/me", web::put().to(update_me))
}

/// 二维码路由 `/qr`
pub fn qr_routes() -> actix_web::Scope {
    web::scope("/qr")
        .route("", web::get().to(get_qr_overview))
        // multipart 上传必须在普通 POST 之前
        .route(
            "",
            web::post()
                .guard(guard::fn_guard(is_multipart))
                .to(post_qr_upload),
        )
        .route("", web::post().to(post_qr_action))
        .route("/image", web::get().to(get_qr_image))
        .route("/{id}/stats", web::get().to(get_qr_stats))
        .route("/{id}/scans", web::get().to(get_qr_scans))
}

/// 主页路由 `/profile`
pub fn profile_routes() -> actix_web::Scope {
    web::scope("/profile")
        .route("", web::get().to(get_profile))
        .route("", web::put().to(update_profile))
        .route("/short-code", web::post().to(regenerate_short_code))
}

/// 文章路由 `/posts`
pub fn posts_routes() -> actix_web::Scope {
    web::scope("/posts")
        .route("", web::get().to(list_posts))
        .route("", web::post().to(create_post))
        // 固定路径必须在 /{id} 之前
        .route("/stats", web::get().to(post_stats))
        .route("/featured", web::get().to(featured_posts))
        .route("/popular", web::get().to(popular_posts))
        .route("/{id}/publish", web::post().to(publish_post))
        .route("/{id}/unpublish", web::post().to(unpublish_post))
        .route("/{id}/archive", web::post().to(archive_post))
        .route("/{id}", web::get().to(get_post))
        .route("/{id}", web::put().to(update_post))
        .route("/{id}", web::delete().to(delete_post))
}

/// 分类路由 `/categories`
pub fn categories_routes() -> actix_web::Scope {
    web::scope("/categories")
        .route("", web::get().to(list_categories))
        .route("", web::post().to(create_category))
        .route("/{id}", web::get().to(get_category))
        .route("/{id}", web::put().to(update_category))
        .route("/{id}", web::delete().to(delete_category))
}

/// 标签路由 `/tags`
pub fn tags_routes() -> actix_web::Scope {
    web::scope("/tags")
        .route("", web::get().to(list_tags))
        .route("", web::post().to(create_tag))
        .route("/{id}", web::get().to(get_tag))
        .route("/{id}", web::put().to(update_tag))
        .route("/{id}", web::delete().to(delete_tag))
}

/// 作者路由 `/authors`
pub fn authors_routes() -> actix_web::Scope {
    web::scope("/authors")
        .route("", web::get().to(list_authors))
        .route("", web::post().to(create_author))
        .route("/{id}/stats", web::get().to(get_author_stats))
        .route("/{id}/password", web::put().to(set_author_password))
        .route("/{id}/reset-password", web::post().to(reset_author_password))
        .route("/{id}", web::get().to(get_author))
        .route("/{id}", web::put().to(update_author))
        .route("/{id}", web::delete().to(delete_author))
}

/// 留言板路由 `/guestbook`
pub fn guestbook_routes() -> actix_web::Scope {
    web::scope("/guestbook")
        .route("", web::get().to(list_entries))
        .route("/{id}/approve", web::post().to(approve_entry))
        .route("/{id}", web::delete().to(delete_entry))
}

/// 公告路由 `/announcements`
pub fn announcements_routes() -> actix_web::Scope {
    web::scope("/announcements")
        .route("", web::get().to(list_announcements))
        .route("", web::post().to(create_announcement))
        .route("/{id}/toggle", web::post().to(toggle_announcement))
        .route("/{id}", web::get().to(get_announcement))
        .route("/{id}", web::put().to(update_announcement))
        .route("/{id}", web::delete().to(delete_announcement))
}

/// 首页卡片路由 `/homepage-cards`
pub fn homepage_cards_routes() -> actix_web::Scope {
    web::scope("/homepage-cards")
        .route("", web::get().to(list_homepage_cards))
        .route("", web::post().to(create_homepage_card))
        .route("/{id}", web::put().to(update_homepage_card))
        .route("/{id}", web::delete().to(delete_announcement))
}

/// 简历路由 `/resumes`
pub fn resumes_routes() -> actix_web::Scope {
    web::scope("/resumes")
        .route("", web::get().to(list_resumes))
        .route("", web::post().to(create_resume))
        .route("/{id}/activate", web::post().to(activate_resume))
        .route("/{id}/pdf", web::post().to(upload_resume_pdf))
        .route("/{id}/qr", web::get().to(get_resume_qr))
        .route("/{id}", web::get().to(get_resume))
        .route("/{id}", web::put().to(update_resume))
        .route("/{id}", web::delete().to(delete_resume))
}

/// Admin API v1 路由
///
/// 组合所有子模块路由，除 `/auth/login|refresh|logout` 外均需管理员 token
pub fn admin_v1_routes() -> impl HttpServiceFactory {
    web::scope("/admin/v1")
        .wrap(JwtAuth::admin())
        .service(auth_routes())
        .service(qr_routes())
        .service(profile_routes())
        .service(posts_routes())
        .service(categories_routes())
        .service(tags_routes())
        .service(authors_routes())
        .service(guestbook_routes())
        .service(announcements_routes())
        .service(homepage_cards_routes())
        .service(resumes_routes())
        .route("/analytics", web::get().to(analytics_summary))
        .route("/settings", web::get().to(get_settings))
        .route("/settings", web::put().to(update_settings))
}
