//! Public site API `/api` and the resume PDF route
//!
//! Read-only content for the blog, guestbook submission and page-visit
//! tracking. Every JSON body uses the `{code, message, data}` envelope except
//! `/api/track`, which answers `{success}`.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::api::services::admin::{
    SlotQuery, api_result, created_response, error_from_linkfolio, success_response,
};
use crate::errors::LinkfolioError;
use crate::services::{
    AnalyticsService, AnnouncementService, DEFAULT_PDF_FILE_NAME, GeoIpProvider, GuestbookService,
    NewGuestbookEntry, PostService, PostStatus, ResumeService, SiteSettingsStore, TaxonomyService,
    VisitorContext, enrich_visit,
};
use crate::storage::{NewPageVisit, Post, PostFilter};

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub likes: i64,
}

#[derive(Debug, Deserialize, Default)]
pub struct PdfQuery {
    #[serde(default)]
    pub download: bool,
}

/// 只有已发布文章对外可见
async fn published_post(posts: &PostService, slug: &str) -> Result<Post, LinkfolioError> {
    posts
        .get_post_by_slug(slug)
        .await?
        .filter(|p| p.status == PostStatus::Published.as_str())
        .ok_or_else(|| LinkfolioError::not_found(format!("Post not found: {}", slug)))
}

/// GET /api/posts
pub async fn list_posts(
    posts: web::Data<PostService>,
    query: web::Query<PostFilter>,
) -> ActixResult<impl Responder> {
    let mut filter = query.into_inner();
    filter.status = Some(PostStatus::Published.as_str().to_string());
    Ok(api_result(posts.list_posts(filter).await))
}

/// GET /api/posts/{slug}：同时累加浏览量
pub async fn get_post(
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let mut post = match published_post(&posts, &path.into_inner()).await {
        Ok(post) => post,
        Err(e) => return Ok(error_from_linkfolio(&e)),
    };

    match posts.increment_views(&post.id).await {
        Ok(()) => post.views += 1,
        Err(e) => warn!("Failed to count view for '{}': {}", post.slug, e),
    }
    Ok(success_response(post))
}

/// POST /api/posts/{slug}/like
pub async fn like_post(
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let post = match published_post(&posts, &path.into_inner()).await {
        Ok(post) => post,
        Err(e) => return Ok(error_from_linkfolio(&e)),
    };
    Ok(api_result(
        posts
            .increment_likes(&post.id)
            .await
            .map(|_| LikeResponse {
                likes: post.likes + 1,
            }),
    ))
}

/// GET /api/categories
pub async fn list_categories(
    taxonomy: web::Data<TaxonomyService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(taxonomy.categories_with_counts().await))
}

/// GET /api/tags
pub async fn list_tags(taxonomy: web::Data<TaxonomyService>) -> ActixResult<impl Responder> {
    Ok(api_result(taxonomy.tags_with_counts().await))
}

/// GET /api/guestbook
pub async fn list_guestbook(
    guestbook: web::Data<GuestbookService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(guestbook.list_approved().await))
}

/// POST /api/guestbook：进入待审核
pub async fn submit_guestbook(
    guestbook: web::Data<GuestbookService>,
    body: web::Json<NewGuestbookEntry>,
) -> ActixResult<impl Responder> {
    match guestbook.submit(body.into_inner()).await {
        Ok(entry) => Ok(created_response(entry)),
        Err(e) => Ok(error_from_linkfolio(&e)),
    }
}

/// POST /api/track
pub async fn track_visit(
    req: HttpRequest,
    analytics: web::Data<AnalyticsService>,
    geoip: Option<web::Data<GeoIpProvider>>,
    body: web::Json<NewPageVisit>,
) -> ActixResult<impl Responder> {
    let ctx = VisitorContext::from_request(&req);
    let visit = enrich_visit(body.into_inner(), &ctx, geoip.as_ref().map(|g| g.get_ref())).await;

    match analytics.track(visit).await {
        Ok(stored) => {
            debug!("Tracked visit to {}", stored.path);
            Ok(HttpResponse::Ok().json(TrackResponse { success: true }))
        }
        Err(e) => {
            error!("Failed to track visit: {}", e);
            Ok(HttpResponse::InternalServerError().json(TrackResponse { success: false }))
        }
    }
}

/// GET /api/announcements?slot=
pub async fn list_announcements(
    announcements: web::Data<AnnouncementService>,
    query: web::Query<SlotQuery>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        announcements.list_active(query.slot.as_deref()).await,
    ))
}

/// GET /api/homepage-cards
pub async fn list_homepage_cards(
    announcements: web::Data<AnnouncementService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(announcements.active_homepage_cards().await))
}

/// GET /api/settings
pub async fn get_settings(settings: web::Data<SiteSettingsStore>) -> ActixResult<impl Responder> {
    Ok(success_response(settings.get().await))
}

/// Content-Disposition 值
///
/// 引号内只放可打印 ASCII（`"`、`\\` 替换为 `_`），原名另以 `filename*` 百分号编码给出
fn pdf_disposition(disposition: &str, file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    let fallback = fallback.trim();
    let fallback = if fallback.is_empty() {
        DEFAULT_PDF_FILE_NAME
    } else {
        fallback
    };

    if fallback == file_name {
        return format!("{}; filename=\"{}\"", disposition, fallback);
    }

    let encoded: String = file_name
        .bytes()
        .filter(|b| !b.is_ascii_control())
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-._~".contains(&b) {
                (b as char).to_string()
            } else {
                format!("%{:02X}", b)
            }
        })
        .collect();
    format!(
        "{}; filename=\"{}\"; filename*=UTF-8''{}",
        disposition, fallback, encoded
    )
}

/// GET /resume/{id}/pdf[?download=true]
pub async fn resume_pdf(
    resumes: web::Data<ResumeService>,
    path: web::Path<String>,
    query: web::Query<PdfQuery>,
) -> ActixResult<impl Responder> {
    let doc = match resumes.pdf(&path.into_inner()).await {
        Ok(doc) => doc,
        Err(e) => {
            let status = e.http_status();
            if status == StatusCode::BAD_GATEWAY {
                warn!("Resume PDF upstream failed: {}", e);
            }
            return Ok(HttpResponse::build(status)
                .content_type("text/plain; charset=utf-8")
                .body(e.message().to_string()));
        }
    };

    let disposition = if query.download {
        "attachment"
    } else {
        "inline"
    };
    Ok(HttpResponse::Ok()
        .content_type(doc.content_type)
        .insert_header((
            "Content-Disposition",
            pdf_disposition(disposition, &doc.file_name),
        ))
        .insert_header((
            "Cache-Control",
            "private, no-cache, no-store, must-revalidate",
        ))
        .body(doc.bytes))
}

/// Public API 路由 `/api`
pub fn public_api_routes() -> actix_web::Scope {
    web::scope("/api")
        .route("/posts", web::get().to(list_posts))
        .route("/posts/{slug}/like", web::post().to(like_post))
        .route("/posts/{slug}", web::get().to(get_post))
        .route("/categories", web::get().to(list_categories))
        .route("/tags", web::get().to(list_tags))
        .route("/guestbook", web::get().to(list_guestbook))
        .route("/guestbook", web::post().to(submit_guestbook))
        .route("/track", web::post().to(track_visit))
        .route("/announcements", web::get().to(list_announcements))
        .route("/homepage-cards", web::get().to(list_homepage_cards))
        .route("/settings", web::get().to(get_settings))
}

/// 简历 PDF 路由 `/resume`
pub fn resume_routes() -> actix_web::Scope {
    web::scope("/resume").route("/{id}/pdf", web::get().to(resume_pdf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_disposition_plain_name() {
        assert_eq!(
            pdf_disposition("inline", "cv.pdf"),
            "inline; filename=\"cv.pdf\""
        );
    }

    #[test]
    fn test_pdf_disposition_escapes_header_breakers() {
        let value = pdf_disposition("attachment", "a\"b\\c\r\nX-Evil: 1.pdf");
        assert!(value.starts_with("attachment; filename=\"a_b_c__X-Evil: 1.pdf\""));
        assert!(!value.contains('\r') && !value.contains('\n'));
        assert!(value.ends_with("filename*=UTF-8''a%22b%5CcX-Evil%3A%201.pdf"));
        assert!(actix_web::http::header::HeaderValue::from_str(&value).is_ok());
    }

    #[test]
    fn test_pdf_disposition_non_ascii_and_empty() {
        let value = pdf_disposition("inline", "简历.pdf");
        assert!(value.starts_with("inline; filename=\"__.pdf\""));
        assert!(value.ends_with("filename*=UTF-8''%E7%AE%80%E5%8E%86.pdf"));

        assert_eq!(
            pdf_disposition("inline", "  "),
            "inline; filename=\"Resume.pdf\"; filename*=UTF-8''%20%20"
        );
    }
}
