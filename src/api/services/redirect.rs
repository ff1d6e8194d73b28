//! Public QR entry points
//!
//! `/qr/{qr_id}` records a scan and sends the visitor to `/links`, which in
//! turn resolves to the active profile at `/me/{short_code}`.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use rust_embed::Embed;
use tracing::{debug, error, trace, warn};

use crate::api::services::admin::{ErrorCode, error_from_linkfolio, error_response, success_response};
use crate::services::{GeoIpProvider, ProfileService, QrService, VisitorContext};

#[derive(Embed)]
#[folder = "assets/"]
struct RedirectAssets;

pub const INVALID_QR_MESSAGE: &str = "Invalid QR code";
pub const INACTIVE_QR_MESSAGE: &str = "This QR code is no longer valid";
const FALLBACK_TARGET: &str = "/about";
const FALLBACK_SECONDS: u32 = 3;

/// 200 HTML 兜底页：3 秒后跳转 /about
pub fn fallback_page(message: &str) -> HttpResponse {
    let template = RedirectAssets::get("qr_invalid.html")
        .map(|file| String::from_utf8_lossy(&file.data).into_owned())
        .unwrap_or_else(|| {
            format!(
                "<!DOCTYPE html><html><body><h1>%MESSAGE%</h1>\
                 <p><a href=\"{}\">Continue</a></p></body></html>",
                FALLBACK_TARGET
            )
        });

    let body = template
        .replace("%MESSAGE%", message)
        .replace("%TARGET%", FALLBACK_TARGET)
        .replace("%SECONDS%", &FALLBACK_SECONDS.to_string());

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .insert_header(("Cache-Control", "no-store"))
        .body(body)
}

fn found(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header(("Location", location))
        .insert_header(("Cache-Control", "no-store"))
        .finish()
}

pub struct RedirectService;

impl RedirectService {
    /// GET /qr/{qr_id}
    pub async fn handle_qr(
        req: HttpRequest,
        path: web::Path<String>,
        qr: web::Data<QrService>,
        geoip: Option<web::Data<GeoIpProvider>>,
    ) -> impl Responder {
        let qr_id = path.into_inner();
        let qr_id = qr_id.trim();
        if qr_id.is_empty() {
            return fallback_page(INVALID_QR_MESSAGE);
        }

        let code = match qr.get_qr_by_qr_id(qr_id).await {
            Ok(Some(code)) if code.is_active => code,
            Ok(Some(_)) => {
                debug!("Inactive QR scanned: {}", qr_id);
                return fallback_page(INACTIVE_QR_MESSAGE);
            }
            Ok(None) => {
                debug!("Unknown QR scanned: {}", qr_id);
                return fallback_page(INACTIVE_QR_MESSAGE);
            }
            Err(e) => {
                error!("QR lookup failed for {}: {}", qr_id, e);
                return fallback_page(INACTIVE_QR_MESSAGE);
            }
        };

        let ctx = VisitorContext::from_request(&req);
        let meta = ctx
            .scan_metadata(geoip.as_ref().map(|g| g.get_ref()))
            .await;

        // 记录失败不影响跳转
        match qr.record_scan(&code.id, meta).await {
            Ok(scan) => trace!("Scan {} recorded for {}", scan.id, code.qr_id),
            Err(e) => warn!("Failed to record scan for {}: {}", code.qr_id, e),
        }

        found("/links")
    }

    /// GET /qr
    pub async fn handle_empty_qr() -> impl Responder {
        fallback_page(INVALID_QR_MESSAGE)
    }

    /// GET /links
    pub async fn handle_links(profiles: web::Data<ProfileService>) -> impl Responder {
        match profiles.get_profile().await {
            Ok(profile) if profile.is_active => found(&format!("/me/{}", profile.short_code)),
            Ok(_) => found("/"),
            Err(e) => {
                error!("Failed to resolve active profile: {}", e);
                found("/")
            }
        }
    }

    /// GET /me/{short_code}
    pub async fn handle_profile(
        path: web::Path<String>,
        profiles: web::Data<ProfileService>,
    ) -> impl Responder {
        match profiles.get_profile_by_short_code(&path.into_inner()).await {
            Ok(Some(profile)) if profile.is_active => success_response(profile),
            Ok(_) => error_response(
                StatusCode::NOT_FOUND,
                ErrorCode::ProfileNotFound,
                "Profile not found",
            ),
            Err(e) => error_from_linkfolio(&e),
        }
    }
}

/// 根路径下的跳转路由，不包成 scope，避免吞掉其它路径
pub fn redirect_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/qr", web::get().to(RedirectService::handle_empty_qr))
        .route("/qr/", web::get().to(RedirectService::handle_empty_qr))
        .route("/qr/{qr_id}", web::get().to(RedirectService::handle_qr))
        .route("/links", web::get().to(RedirectService::handle_links))
        .route("/me/{short_code}", web::get().to(RedirectService::handle_profile));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_rt::test]
    async fn test_fallback_page_contents() {
        let resp = fallback_page(INACTIVE_QR_MESSAGE);
        assert_eq!(resp.status(), StatusCode::OK);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains(INACTIVE_QR_MESSAGE));
        assert!(html.contains("/about"));
        assert!(!html.contains("%MESSAGE%"));
        assert!(!html.contains("%SECONDS%"));
    }

    #[test]
    fn test_fallback_template_is_embedded() {
        let file = RedirectAssets::get("qr_invalid.html").expect("template embedded");
        let html = String::from_utf8_lossy(&file.data);
        assert!(html.contains("%MESSAGE%"));
        assert!(html.contains("countdown"));
    }
}
