//! Multipart 表单读取与上传文件落盘

use std::collections::HashMap;
use std::path::Path;

use actix_multipart::Multipart;
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use futures_util::StreamExt;
use tracing::{error, info};

use crate::errors::LinkfolioError;

use super::error_code::ErrorCode;
use super::helpers::error_response;

/// 上传的单个文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// 解析后的 multipart 表单：文本字段 + `file` 字段
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// 读取整个 multipart 请求体
///
/// `file` 字段超过 `max_bytes` 时返回 400 FileTooLarge
pub async fn read_upload_form(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<UploadForm, HttpResponse> {
    let mut form = UploadForm::default();

    while let Some(item) = payload.next().await {
        let mut field = match item {
            Ok(f) => f,
            Err(e) => {
                error!("Failed to parse multipart field: {}", e);
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidMultipartData,
                    &format!("Invalid multipart data: {}", e),
                ));
            }
        };

        let field_name = field.name().unwrap_or("").to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            match chunk {
                Ok(bytes) => {
                    if data.len() + bytes.len() > max_bytes {
                        return Err(error_response(
                            StatusCode::BAD_REQUEST,
                            ErrorCode::FileTooLarge,
                            &format!("File size exceeds maximum {} bytes", max_bytes),
                        ));
                    }
                    data.extend_from_slice(&bytes);
                }
                Err(e) => {
                    error!("Failed to read multipart chunk: {}", e);
                    return Err(error_response(
                        StatusCode::BAD_REQUEST,
                        ErrorCode::InvalidMultipartData,
                        &format!("Failed to read upload: {}", e),
                    ));
                }
            }
        }

        if field_name == "file" {
            form.file = Some(UploadedFile {
                bytes: data,
                file_name,
                content_type,
            });
        } else {
            form.fields
                .insert(field_name, String::from_utf8_lossy(&data).into_owned());
        }
    }

    Ok(form)
}

/// 仅保留安全的扩展名（字母数字，最多 8 位）
fn safe_extension(file_name: Option<&str>) -> Option<String> {
    let ext = Path::new(file_name?).extension()?.to_str()?.to_ascii_lowercase();
    (!ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .then_some(ext)
}

/// 以 uuid 文件名写入上传目录，返回公开 URL
pub async fn store_upload(
    file: &UploadedFile,
    upload_dir: &str,
    url_prefix: &str,
) -> Result<String, LinkfolioError> {
    if file.bytes.is_empty() {
        return Err(LinkfolioError::validation("No file provided"));
    }

    let name = match safe_extension(file.file_name.as_deref()) {
        Some(ext) => format!("{}.{}", uuid::Uuid::new_v4(), ext),
        None => uuid::Uuid::new_v4().to_string(),
    };

    tokio::fs::create_dir_all(upload_dir).await?;
    let path = Path::new(upload_dir).join(&name);
    tokio::fs::write(&path, &file.bytes).await?;
    info!("Stored upload {} ({} bytes)", path.display(), file.bytes.len());

    Ok(format!("{}/{}", url_prefix.trim_end_matches('/'), name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_extension() {
        assert_eq!(safe_extension(Some("card.PNG")).as_deref(), Some("png"));
        assert_eq!(safe_extension(Some("archive.tar.gz")).as_deref(), Some("gz"));
        assert_eq!(safe_extension(Some("noext")), None);
        assert_eq!(safe_extension(Some("bad.ph p")), None);
        assert_eq!(safe_extension(None), None);
    }

    #[tokio::test]
    async fn test_store_upload_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let upload_dir = dir.path().to_str().unwrap();
        let file = UploadedFile {
            bytes: b"\x89PNG fake".to_vec(),
            file_name: Some("qr.png".to_string()),
            content_type: Some("image/png".to_string()),
        };

        let url = store_upload(&file, upload_dir, "/uploads/").await.unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with(".png"));

        let name = url.trim_start_matches("/uploads/");
        let stored = std::fs::read(dir.path().join(name)).unwrap();
        assert_eq!(stored, file.bytes);
    }

    #[tokio::test]
    async fn test_store_upload_rejects_empty() {
        let dir = tempfile::tempdir().unwrap();
        let file = UploadedFile {
            bytes: Vec::new(),
            file_name: None,
            content_type: None,
        };
        let err = store_upload(&file, dir.path().to_str().unwrap(), "/uploads")
            .await
            .unwrap_err();
        assert!(matches!(err, LinkfolioError::Validation(_)));
    }
}
