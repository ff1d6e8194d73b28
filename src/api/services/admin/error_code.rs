//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use crate::errors::LinkfolioError;

use super::types::TS_EXPORT_PATH;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，ts-rs 自动生成 TypeScript 类型。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: QR / 主页错误
/// - 4000-4099: 内容错误（文章、分类、标签）
/// - 5000-5099: 上传与外部资源错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    FileTooLarge = 1011,
    ServiceUnavailable = 1030,

    // 认证错误 2000-2099
    AuthFailed = 2000,
    TokenExpired = 2001,
    TokenInvalid = 2002,
    RateLimitExceeded = 2004,
    PasswordChangeRequired = 2005,

    // QR / 主页错误 3000-3099
    QrNotFound = 3000,
    QrInvalidAction = 3001,
    ProfileNotFound = 3002,

    // 内容错误 4000-4099
    SlugConflict = 4000,
    ContentValidation = 4001,

    // 上传与外部资源 5000-5099
    InvalidMultipartData = 5000,
    UploadFailed = 5001,
    UpstreamFetchFailed = 5002,
}

impl From<LinkfolioError> for ErrorCode {
    fn from(err: LinkfolioError) -> Self {
        match err {
            LinkfolioError::Validation(_) => ErrorCode::BadRequest,
            LinkfolioError::NotFound(_) => ErrorCode::NotFound,
            LinkfolioError::Conflict(_) => ErrorCode::Conflict,
            LinkfolioError::Unauthorized(_) => ErrorCode::Unauthorized,
            LinkfolioError::Forbidden(_) => ErrorCode::Forbidden,
            LinkfolioError::Upstream(_) => ErrorCode::UpstreamFetchFailed,
            LinkfolioError::FileOperation(_) => ErrorCode::UploadFailed,
            LinkfolioError::DatabaseConfig(_)
            | LinkfolioError::DatabaseConnection(_)
            | LinkfolioError::DatabaseOperation(_)
            | LinkfolioError::Serialization(_)
            | LinkfolioError::PasswordHash(_) => ErrorCode::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&ErrorCode::Success).unwrap(), "0");
        assert_eq!(serde_json::to_string(&ErrorCode::QrNotFound).unwrap(), "3000");
    }

    #[test]
    fn test_from_linkfolio_error() {
        assert_eq!(
            ErrorCode::from(LinkfolioError::conflict("slug")),
            ErrorCode::Conflict
        );
        assert_eq!(
            ErrorCode::from(LinkfolioError::database_operation("x")),
            ErrorCode::InternalServerError
        );
        assert_eq!(
            ErrorCode::from(LinkfolioError::upstream("502")),
            ErrorCode::UpstreamFetchFailed
        );
    }
}
