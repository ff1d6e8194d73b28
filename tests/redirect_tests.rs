//! `/qr/{id}` → `/links` → `/me/{short_code}` flow over HTTP

mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::App;
use async_trait::async_trait;
use sea_orm::{EntityTrait, PaginatorTrait};

use linkfolio::api::services::configure_routes;
use linkfolio::api::services::redirect::{INACTIVE_QR_MESSAGE, INVALID_QR_MESSAGE};
use linkfolio::services::{GeoIpLookup, GeoIpProvider};
use migration::entities::qr_scan;

macro_rules! redirect_app {
    ($services:expr) => {{
        let services = $services.clone();
        test::init_service(
            App::new()
                .configure(move |cfg| services.register(cfg))
                .configure(configure_routes),
        )
        .await
    }};
}

async fn scan_rows(env: &common::TestEnv) -> u64 {
    qr_scan::Entity::find()
        .count(env.storage.get_db())
        .await
        .unwrap()
}

/// Answers "NL" for every address and counts the calls
struct FixedCountry {
    calls: AtomicUsize,
}

#[async_trait]
impl GeoIpLookup for FixedCountry {
    async fn country(&self, _ip: &str) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some("NL".to_string())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

fn location(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_rt::test]
async fn test_valid_qr_redirects_and_records_one_scan() {
    let env = common::setup_storage("redirect_valid").await;
    let services = common::build_services(&env);
    let profile = services.profiles.get_profile().await.unwrap();
    let code = services.qr.create_qr(&profile.id, None, None).await.unwrap();
    let app = redirect_app!(services);

    let req = TestRequest::get()
        .uri(&format!("/qr/{}", code.qr_id))
        .insert_header((
            "user-agent",
            "Mozilla/5.0 (Linux; Android 14) Mobile Chrome/120.0",
        ))
        .insert_header(("x-forwarded-for", "203.0.113.9"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/links");
    assert_eq!(scan_rows(&env).await, 1);

    let stored = services.qr.get_qr_by_id(&code.id).await.unwrap().unwrap();
    assert_eq!(stored.total_scans, 1);

    let scans = services.qr.recent_scans(&code.id, 5).await.unwrap();
    assert_eq!(scans[0].device, "mobile");
    assert_eq!(scans[0].browser, "Chrome");
}

#[actix_rt::test]
async fn test_unknown_qr_serves_fallback_without_scan() {
    let env = common::setup_storage("redirect_unknown").await;
    let services = common::build_services(&env);
    let app = redirect_app!(services);

    let req = TestRequest::get().uri("/qr/unknown999").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains(INACTIVE_QR_MESSAGE));
    assert!(html.contains("/about"));
    assert_eq!(scan_rows(&env).await, 0);
}

#[actix_rt::test]
async fn test_inactive_qr_serves_fallback_without_scan() {
    let env = common::setup_storage("redirect_inactive").await;
    let services = common::build_services(&env);
    let profile = services.profiles.get_profile().await.unwrap();
    let old = services.qr.create_qr(&profile.id, None, None).await.unwrap();
    services
        .qr
        .regenerate_qr(&profile.id, None, None)
        .await
        .unwrap();
    let app = redirect_app!(services);

    let req = TestRequest::get().uri(&format!("/qr/{}", old.qr_id)).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(scan_rows(&env).await, 0);
}

#[actix_rt::test]
async fn test_empty_qr_id() {
    let env = common::setup_storage("redirect_empty").await;
    let services = common::build_services(&env);
    let app = redirect_app!(services);

    let req = TestRequest::get().uri("/qr/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains(INVALID_QR_MESSAGE));
}

#[actix_rt::test]
async fn test_links_resolves_active_profile() {
    let env = common::setup_storage("redirect_links").await;
    let services = common::build_services(&env);
    let profile = services.profiles.get_profile().await.unwrap();
    let app = redirect_app!(services);

    let req = TestRequest::get().uri("/links").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/me/{}", profile.short_code));

    let req = TestRequest::get()
        .uri(&format!("/me/{}", profile.short_code))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["id"], profile.id);

    let req = TestRequest::get().uri("/me/doesnotexist").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_scan_country_resolved_before_redirect() {
    let env = common::setup_storage("redirect_geoip").await;
    let lookup = Arc::new(FixedCountry {
        calls: AtomicUsize::new(0),
    });
    let geoip = GeoIpProvider::with_lookup(lookup.clone());
    assert_eq!(geoip.provider_name(), "fixed");
    let services = common::build_services_with_geoip(&env, Some(geoip));
    let profile = services.profiles.get_profile().await.unwrap();
    let code = services.qr.create_qr(&profile.id, None, None).await.unwrap();
    let app = redirect_app!(services);

    let req = TestRequest::get()
        .uri(&format!("/qr/{}", code.qr_id))
        .insert_header(("x-forwarded-for", "8.8.8.8"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    // 查询在请求内完成，响应返回时国家码已落库
    let scans = services.qr.recent_scans(&code.id, 5).await.unwrap();
    assert_eq!(scans[0].country.as_deref(), Some("NL"));
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);

    // 代理头优先，私有地址不查询
    let req = TestRequest::get()
        .uri(&format!("/qr/{}", code.qr_id))
        .insert_header(("x-forwarded-for", "8.8.8.8"))
        .insert_header(("cf-ipcountry", "de"))
        .to_request();
    test::call_service(&app, req).await;
    let req = TestRequest::get()
        .uri(&format!("/qr/{}", code.qr_id))
        .insert_header(("x-forwarded-for", "10.1.2.3"))
        .to_request();
    test::call_service(&app, req).await;

    let scans = services.qr.recent_scans(&code.id, 5).await.unwrap();
    assert_eq!(scans.len(), 3);
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    let countries: Vec<Option<&str>> = scans.iter().map(|s| s.country.as_deref()).collect();
    assert!(countries.contains(&Some("DE")));
    assert!(countries.contains(&None));
}
