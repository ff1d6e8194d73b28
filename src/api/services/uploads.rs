use std::path::Path;

use actix_web::{HttpRequest, HttpResponse, Result, web};
use tracing::{debug, trace};

use crate::api::app_state::UploadSettings;

/// 根据文件扩展名确定 Content-Type
fn content_type_for(name: &str) -> &'static str {
    match name.rsplit('.').next().map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// 上传文件名只允许单级、无路径穿越
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
}

/// GET {upload_url_prefix}/{name}
pub async fn serve_upload(
    req: HttpRequest,
    uploads: web::Data<UploadSettings>,
) -> Result<HttpResponse> {
    let name = req.match_info().query("name");
    trace!("Serving upload: {}", name);

    if !is_safe_name(name) {
        return Ok(HttpResponse::NotFound().body("File not found"));
    }

    let path = Path::new(&uploads.upload_dir).join(name);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(HttpResponse::Ok()
            .content_type(content_type_for(name))
            .insert_header(("Cache-Control", "public, max-age=86400"))
            .body(bytes)),
        Err(e) => {
            debug!("Upload not found {}: {}", path.display(), e);
            Ok(HttpResponse::NotFound().body("File not found"))
        }
    }
}

/// 上传文件路由，挂载在 `upload_url_prefix` 下
pub fn upload_routes(url_prefix: &str) -> actix_web::Scope {
    web::scope(url_prefix.trim_end_matches('/')).route("/{name}", web::get().to(serve_upload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_for() {
        assert_eq!(content_type_for("a.PNG"), "image/png");
        assert_eq!(content_type_for("b.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("noext"), "application/octet-stream");
    }

    #[test]
    fn test_is_safe_name() {
        assert!(is_safe_name("2f1c-44aa.png"));
        assert!(!is_safe_name("../secret"));
        assert!(!is_safe_name(".env"));
        assert!(!is_safe_name("a/b.png"));
        assert!(!is_safe_name(""));
    }
}
