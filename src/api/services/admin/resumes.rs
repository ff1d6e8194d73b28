//! 简历管理端点

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{Responder, Result as ActixResult, web};
use tracing::info;

use crate::api::app_state::UploadSettings;
use crate::errors::LinkfolioError;
use crate::services::qr_image::DEFAULT_IMAGE_SIZE;
use crate::services::{QrService, QrTheme, ResumeInput, ResumeService, render_qr_png};

use super::error_code::ErrorCode;
use super::helpers::{
    api_deleted, api_found, api_result, created_response, error_from_linkfolio, error_response,
};
use super::qr::png_response;
use super::types::QrImageQuery;
use super::upload::read_upload_form;

/// GET /resumes
pub async fn list_resumes(resumes: web::Data<ResumeService>) -> ActixResult<impl Responder> {
    Ok(api_result(resumes.list().await))
}

/// GET /resumes/{id}
pub async fn get_resume(
    resumes: web::Data<ResumeService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_found(resumes.get(&path.into_inner()).await, "Resume"))
}

/// POST /resumes
pub async fn create_resume(
    resumes: web::Data<ResumeService>,
    body: web::Json<ResumeInput>,
) -> ActixResult<impl Responder> {
    match resumes.create(body.into_inner()).await {
        Ok(resume) => Ok(created_response(resume)),
        Err(e) => Ok(error_from_linkfolio(&e)),
    }
}

/// PUT /resumes/{id}
pub async fn update_resume(
    resumes: web::Data<ResumeService>,
    path: web::Path<String>,
    body: web::Json<ResumeInput>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        resumes.update(&path.into_inner(), body.into_inner()).await,
    ))
}

/// DELETE /resumes/{id}
pub async fn delete_resume(
    resumes: web::Data<ResumeService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_deleted(resumes.delete(&path.into_inner()).await, "Resume"))
}

/// POST /resumes/{id}/activate
pub async fn activate_resume(
    resumes: web::Data<ResumeService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_result(resumes.set_active(&path.into_inner()).await))
}

/// POST /resumes/{id}/pdf（multipart，字段 `file`）
pub async fn upload_resume_pdf(
    payload: Multipart,
    path: web::Path<String>,
    resumes: web::Data<ResumeService>,
    uploads: web::Data<UploadSettings>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let form = match read_upload_form(payload, uploads.max_bytes).await {
        Ok(form) => form,
        Err(resp) => return Ok(resp),
    };

    let Some(file) = form.file else {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidMultipartData,
            "No file provided",
        ));
    };

    info!(
        "Admin API: PDF upload for resume {} ({} bytes)",
        id,
        file.bytes.len()
    );
    Ok(api_result(
        resumes
            .upload_pdf(&id, file.bytes, file.file_name, file.content_type)
            .await,
    ))
}

/// GET /resumes/{id}/qr：指向公开 PDF 的二维码（默认黑白）
pub async fn get_resume_qr(
    resumes: web::Data<ResumeService>,
    qr: web::Data<QrService>,
    path: web::Path<String>,
    query: web::Query<QrImageQuery>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    let resume = match resumes.get(&id).await {
        Ok(Some(resume)) => resume,
        Ok(None) => {
            return Ok(error_from_linkfolio(&LinkfolioError::not_found(
                "Resume not found",
            )));
        }
        Err(e) => return Ok(error_from_linkfolio(&e)),
    };
    if !resume.has_pdf() {
        return Ok(error_from_linkfolio(&LinkfolioError::not_found(
            "Resume has no PDF yet",
        )));
    }

    let theme = query
        .theme
        .as_deref()
        .map_or(QrTheme::Mono, QrTheme::from_name);
    let size = query.size.unwrap_or(DEFAULT_IMAGE_SIZE);
    match render_qr_png(&qr.resume_pdf_url(&resume.id), theme, size) {
        Ok(png) => Ok(png_response(
            png,
            &format!("resume-{}-qr.png", resume.id),
            query.download,
        )),
        Err(e) => Ok(error_from_linkfolio(&e)),
    }
}
