//! API 模块常量定义
//!
//! Cookie 名称与认证相关的硬编码常量。

/// 管理后台 Access Token Cookie 名称
pub const ACCESS_COOKIE_NAME: &str = "linkfolio_access";

/// 管理后台 Refresh Token Cookie 名称
pub const REFRESH_COOKIE_NAME: &str = "linkfolio_refresh";

/// 作者门户 Access Token Cookie 名称
pub const AUTHOR_ACCESS_COOKIE_NAME: &str = "linkfolio_author";

/// Refresh Cookie 仅在该路径下发送
pub const REFRESH_COOKIE_PATH: &str = "/admin/v1/auth";
