//! Public `/resume/{id}/pdf` delivery: stored bytes, remote proxy, upstream failures

mod common;

use actix_web::App;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};

use linkfolio::api::services::configure_routes;
use linkfolio::services::ResumeInput;

macro_rules! public_app {
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

fn header(resp: &actix_web::dev::ServiceResponse, name: &str) -> String {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn remote_resume(url: String) -> ResumeInput {
    ResumeInput {
        title: Some("Remote CV".to_string()),
        pdf_url: Some(url),
        ..Default::default()
    }
}

#[actix_rt::test]
async fn test_remote_pdf_is_proxied() {
    let env = common::setup_storage("public_pdf_remote").await;
    let services = common::build_services(&env);
    let url = common::serve_once(200, "application/pdf", b"%PDF-1.7 remote");
    let resume = services.resumes.create(remote_resume(url)).await.unwrap();
    let app = public_app!(services);

    let req = TestRequest::get()
        .uri(&format!("/resume/{}/pdf?download=true", resume.id))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(header(&resp, "content-type"), "application/pdf");
    assert_eq!(
        header(&resp, "content-disposition"),
        "attachment; filename=\"Resume.pdf\""
    );
    let body = test::read_body(resp).await;
    assert_eq!(&body[..], b"%PDF-1.7 remote");
}

#[actix_rt::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let env = common::setup_storage("public_pdf_down").await;
    let services = common::build_services(&env);
    let resume = services
        .resumes
        .create(remote_resume(common::unreachable_url()))
        .await
        .unwrap();
    let app = public_app!(services);

    let req = TestRequest::get()
        .uri(&format!("/resume/{}/pdf", resume.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[actix_rt::test]
async fn test_upstream_error_status_is_bad_gateway() {
    let env = common::setup_storage("public_pdf_404").await;
    let services = common::build_services(&env);
    let url = common::serve_once(404, "text/plain", b"gone");
    let resume = services.resumes.create(remote_resume(url)).await.unwrap();
    let app = public_app!(services);

    let req = TestRequest::get()
        .uri(&format!("/resume/{}/pdf", resume.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[actix_rt::test]
async fn test_missing_pdf_and_unknown_resume_are_not_found() {
    let env = common::setup_storage("public_pdf_missing").await;
    let services = common::build_services(&env);
    let empty = services
        .resumes
        .create(ResumeInput {
            title: Some("No PDF".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let app = public_app!(services);

    for uri in [
        format!("/resume/{}/pdf", empty.id),
        "/resume/does-not-exist/pdf".to_string(),
    ] {
        let resp = test::call_service(&app, TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_rt::test]
async fn test_stored_pdf_file_name_is_sanitised() {
    let env = common::setup_storage("public_pdf_name").await;
    let services = common::build_services(&env);
    let resume = services
        .resumes
        .create(ResumeInput {
            title: Some("CV".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    services
        .resumes
        .upload_pdf(
            &resume.id,
            b"%PDF-1.4 stored".to_vec(),
            Some("my \"best\" cv.pdf".to_string()),
            None,
        )
        .await
        .unwrap();
    let app = public_app!(services);

    let req = TestRequest::get()
        .uri(&format!("/resume/{}/pdf", resume.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        header(&resp, "content-disposition"),
        "inline; filename=\"my _best_ cv.pdf\"; filename*=UTF-8''my%20%22best%22%20cv.pdf"
    );
}
