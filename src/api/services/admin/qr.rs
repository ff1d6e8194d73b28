//! QR 管理端点
//!
//! - GET  /qr               当前活跃二维码 + 统计（首次访问时自动签发）
//! - POST /qr               regenerate / custom-url（JSON 或表单）
//! - POST /qr (multipart)   custom-upload
//! - GET  /qr/image         活跃二维码 PNG
//! - GET  /qr/{id}/stats
//! - GET  /qr/{id}/scans

use actix_multipart::Multipart;
use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use tracing::{error, info, warn};

use crate::api::app_state::UploadSettings;
use crate::errors::LinkfolioError;
use crate::services::qr_image::DEFAULT_IMAGE_SIZE;
use crate::services::{ProfileService, QrService, QrTheme, RECENT_SCANS_LIMIT, png_data_uri, render_qr_png};
use crate::storage::{Profile, QrCode, QrWithScans};

use super::error_code::ErrorCode;
use super::helpers::{api_found, api_result, error_from_linkfolio, json_response};
use super::types::{
    QrActionRequest, QrActionResponse, QrImageQuery, QrOverview, ScansQuery, ScansResponse,
};
use super::upload::{read_upload_form, store_upload};

const MAX_SCANS_LIMIT: u64 = 500;

fn action_failed(status: StatusCode, code: ErrorCode, error: &str) -> HttpResponse {
    json_response(status, code, error.to_string(), Some(QrActionResponse::failed(error)))
}

fn action_ok(message: &str) -> HttpResponse {
    json_response(
        StatusCode::OK,
        ErrorCode::Success,
        "OK",
        Some(QrActionResponse::ok(message)),
    )
}

fn action_error(err: &LinkfolioError) -> HttpResponse {
    if err.http_status().is_server_error() {
        error!("Admin API: QR action failed: {}", err);
    }
    action_failed(err.http_status(), ErrorCode::from(err.clone()), err.message())
}

/// 当前活跃二维码；没有时为主页签发第一个
async fn active_or_issue(
    qr: &QrService,
    profile: &Profile,
) -> Result<QrWithScans, LinkfolioError> {
    if let Some(active) = qr.get_active_qr(&profile.id).await? {
        return Ok(active);
    }
    info!("Admin API: no active QR for profile, issuing one");
    let issued = qr
        .create_qr(&profile.id, profile.qr_code_url.clone(), None)
        .await?;
    Ok(QrWithScans {
        qr: issued,
        scans: Vec::new(),
    })
}

async fn build_overview(
    qr: &QrService,
    profiles: &ProfileService,
) -> Result<QrOverview, LinkfolioError> {
    let profile = profiles.get_profile().await?;
    let active = active_or_issue(qr, &profile).await?;
    let stats = qr.get_qr_stats(&active.qr.id).await?;
    let qr_url = qr.qr_url(&active.qr.qr_id);
    let qr_data_uri = match render_qr_png(
        &qr_url,
        QrTheme::from_name(&active.qr.qr_theme),
        DEFAULT_IMAGE_SIZE,
    ) {
        Ok(png) => Some(png_data_uri(&png)),
        Err(e) => {
            warn!("Admin API: QR preview not rendered: {}", e);
            None
        }
    };
    Ok(QrOverview {
        qr_url,
        profile_url: profiles.profile_url(&profile.short_code),
        qr_data_uri,
        stats,
        qr: active,
    })
}

/// `image/png` body, inline or as a download
pub(super) fn png_response(png: Vec<u8>, file_name: &str, download: bool) -> HttpResponse {
    let disposition = if download { "attachment" } else { "inline" };
    HttpResponse::Ok()
        .content_type("image/png")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("{}; filename=\"{}\"", disposition, file_name),
        ))
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .body(png)
}

/// GET /qr/image?theme=&size=&download=
pub async fn get_qr_image(
    qr: web::Data<QrService>,
    profiles: web::Data<ProfileService>,
    query: web::Query<QrImageQuery>,
) -> ActixResult<impl Responder> {
    let active = match profiles.get_profile().await {
        Ok(profile) => active_or_issue(&qr, &profile).await,
        Err(e) => Err(e),
    };
    let active = match active {
        Ok(active) => active.qr,
        Err(e) => return Ok(error_from_linkfolio(&e)),
    };

    let theme = QrTheme::from_name(query.theme.as_deref().unwrap_or(active.qr_theme.as_str()));
    let size = query.size.unwrap_or(DEFAULT_IMAGE_SIZE);
    match render_qr_png(&qr.qr_url(&active.qr_id), theme, size) {
        Ok(png) => Ok(png_response(
            png,
            &format!("qr-{}.png", active.qr_id),
            query.download,
        )),
        Err(e) => Ok(error_from_linkfolio(&e)),
    }
}

/// GET /qr
pub async fn get_qr_overview(
    qr: web::Data<QrService>,
    profiles: web::Data<ProfileService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(build_overview(&qr, &profiles).await))
}

/// 给活跃二维码设置图片，同时写回主页
async fn assign_image(
    qr: &QrService,
    profiles: &ProfileService,
    image_url: &str,
) -> Result<QrCode, LinkfolioError> {
    let profile = profiles.get_profile().await?;
    let active = active_or_issue(qr, &profile).await?;
    qr.update_qr_code_url(&active.qr.id, image_url).await?;
    profiles.update_profile_qr_url(&profile.id, image_url).await?;
    Ok(active.qr)
}

/// POST /qr（JSON 或 application/x-www-form-urlencoded）
pub async fn post_qr_action(
    qr: web::Data<QrService>,
    profiles: web::Data<ProfileService>,
    body: web::Either<web::Json<QrActionRequest>, web::Form<QrActionRequest>>,
) -> ActixResult<impl Responder> {
    let request = match body {
        web::Either::Left(json) => json.into_inner(),
        web::Either::Right(form) => form.into_inner(),
    };
    info!("Admin API: QR action '{}'", request.action);

    match request.action.as_str() {
        "regenerate" => {
            let profile = match profiles.get_profile().await {
                Ok(p) => p,
                Err(e) => return Ok(action_error(&e)),
            };
            match qr
                .regenerate_qr(&profile.id, profile.qr_code_url.clone(), request.theme)
                .await
            {
                Ok(new_qr) => Ok(action_ok(&format!(
                    "QR code regenerated: {}",
                    qr.qr_url(&new_qr.qr_id)
                ))),
                Err(e) => Ok(action_error(&e)),
            }
        }
        "custom-url" => {
            let Some(image_url) = request
                .image_url
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
            else {
                return Ok(action_failed(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::BadRequest,
                    "image_url is required",
                ));
            };
            match assign_image(&qr, &profiles, image_url).await {
                Ok(_) => Ok(action_ok("Custom QR image URL saved")),
                Err(e) => Ok(action_error(&e)),
            }
        }
        "custom-upload" => Ok(action_failed(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidMultipartData,
            "custom-upload requires multipart/form-data",
        )),
        other => {
            warn!("Admin API: unknown QR action '{}'", other);
            Ok(action_failed(
                StatusCode::BAD_REQUEST,
                ErrorCode::QrInvalidAction,
                "Unknown action",
            ))
        }
    }
}

/// POST /qr（multipart/form-data，action=custom-upload + file）
pub async fn post_qr_upload(
    payload: Multipart,
    qr: web::Data<QrService>,
    profiles: web::Data<ProfileService>,
    uploads: web::Data<UploadSettings>,
) -> ActixResult<impl Responder> {
    let form = match read_upload_form(payload, uploads.max_bytes).await {
        Ok(form) => form,
        Err(resp) => return Ok(resp),
    };

    if form.field("action") != Some("custom-upload") {
        return Ok(action_failed(
            StatusCode::BAD_REQUEST,
            ErrorCode::QrInvalidAction,
            "Unknown action",
        ));
    }

    let Some(file) = form.file.as_ref().filter(|f| !f.bytes.is_empty()) else {
        return Ok(action_failed(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidMultipartData,
            "No file provided",
        ));
    };

    let url = match store_upload(file, &uploads.upload_dir, &uploads.url_prefix).await {
        Ok(url) => url,
        Err(e) => return Ok(action_error(&e)),
    };

    match assign_image(&qr, &profiles, &url).await {
        Ok(_) => Ok(action_ok(&format!("QR image uploaded: {}", url))),
        Err(e) => Ok(action_error(&e)),
    }
}

/// GET /qr/{id}/stats
pub async fn get_qr_stats(
    path: web::Path<String>,
    qr: web::Data<QrService>,
) -> ActixResult<impl Responder> {
    Ok(api_found(qr.get_qr_stats(&path.into_inner()).await, "QR code"))
}

/// GET /qr/{id}/scans?limit=
pub async fn get_qr_scans(
    path: web::Path<String>,
    query: web::Query<ScansQuery>,
    qr: web::Data<QrService>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    match qr.get_qr_by_id(&id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(error_from_linkfolio(&LinkfolioError::not_found(format!(
                "QR code not found: {}",
                id
            ))));
        }
        Err(e) => return Ok(error_from_linkfolio(&e)),
    }

    let limit = query
        .limit
        .unwrap_or(RECENT_SCANS_LIMIT)
        .clamp(1, MAX_SCANS_LIMIT);
    Ok(api_result(
        qr.recent_scans(&id, limit)
            .await
            .map(|scans| ScansResponse { scans }),
    ))
}
