//! Admin API 类型定义

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::storage::{QrScan, QrStats, QrWithScans};

/// 输出目录常量
pub const TS_EXPORT_PATH: &str = "../admin-panel/src/services/types.generated.ts";

/// 统一响应信封 `{code, message, data}`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AuthSuccessResponse {
    pub message: String,
    pub access_token: String,
    #[ts(optional)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// 秒
    pub expires_in: u64,
    #[serde(default)]
    pub must_change_password: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct VerifyResponse {
    pub message: String,
    pub username: String,
    pub role: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    pub new_password: String,
}

/// 作者创建/重置后一次性返回的临时密码
#[derive(Serialize, Clone, Debug)]
pub struct TemporaryPasswordResponse<T> {
    #[serde(flatten)]
    pub item: T,
    pub temporary_password: String,
}

/// `POST /qr` 的 JSON/表单请求体
#[derive(Deserialize, Clone, Debug, Default, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct QrActionRequest {
    pub action: String,
    #[ts(optional)]
    pub theme: Option<String>,
    #[ts(optional)]
    pub image_url: Option<String>,
}

/// QR 动作结果 `{success, message}` / `{success:false, error}`
#[derive(Serialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct QrActionResponse {
    pub success: bool,
    #[ts(optional)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[ts(optional)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QrActionResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// `GET /qr` 返回的当前 QR 概览
#[derive(Serialize, Clone, Debug)]
pub struct QrOverview {
    pub qr: QrWithScans,
    pub stats: Option<QrStats>,
    pub qr_url: String,
    pub profile_url: String,
    /// 名片预览用的 PNG data URI（按二维码主题渲染）
    pub qr_data_uri: Option<String>,
}

/// `GET /qr/image`, `GET /resumes/{id}/qr`
#[derive(Deserialize, Clone, Debug, Default)]
pub struct QrImageQuery {
    /// light / dark / mono；缺省使用二维码自身主题
    pub theme: Option<String>,
    pub size: Option<u32>,
    /// 带 `Content-Disposition: attachment`
    #[serde(default)]
    pub download: bool,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ScansQuery {
    pub limit: Option<u64>,
}

#[derive(Serialize, Clone, Debug)]
pub struct ScansResponse {
    pub scans: Vec<QrScan>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct SlotQuery {
    pub slot: Option<String>,
}

/// 存储健康检查
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthChecks {
    pub storage: HealthStorageCheck,
}

/// GET /health 响应
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub checks: HealthChecks,
    pub response_time_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_typescript_types() {
        // 运行此测试会自动生成 TypeScript 类型文件
        // cargo test export_typescript_types -- --nocapture
        let cfg = ts_rs::Config::from_env();
        LoginCredentials::export_all(&cfg).expect("Failed to export LoginCredentials");
        AuthSuccessResponse::export_all(&cfg).expect("Failed to export AuthSuccessResponse");
        MessageResponse::export_all(&cfg).expect("Failed to export MessageResponse");
        VerifyResponse::export_all(&cfg).expect("Failed to export VerifyResponse");
        PasswordChangeRequest::export_all(&cfg).expect("Failed to export PasswordChangeRequest");
        QrActionRequest::export_all(&cfg).expect("Failed to export QrActionRequest");
        QrActionResponse::export_all(&cfg).expect("Failed to export QrActionResponse");
        super::super::ErrorCode::export_all(&cfg).expect("Failed to export ErrorCode");
        crate::services::CreatePostInput::export_all(&cfg).expect("Failed to export CreatePostInput");
        crate::services::UpdatePostInput::export_all(&cfg).expect("Failed to export UpdatePostInput");
        crate::services::PostStatus::export_all(&cfg).expect("Failed to export PostStatus");

        println!("TypeScript types exported to {}", TS_EXPORT_PATH);
    }

    #[test]
    fn test_qr_action_response_shape() {
        let ok = serde_json::to_value(QrActionResponse::ok("done")).unwrap();
        assert_eq!(ok["success"], true);
        assert!(ok.get("error").is_none());

        let failed = serde_json::to_value(QrActionResponse::failed("nope")).unwrap();
        assert_eq!(failed["success"], false);
        assert_eq!(failed["error"], "nope");
    }
}
