//! Admin API 服务模块
//!
//! 该模块包含管理后台 `/admin/v1` 的所有端点，包括：
//! - 认证（登录、登出、token 刷新）
//! - 二维码与 Linktree 主页
//! - 文章、分类、标签、作者
//! - 留言板审核、公告、首页卡片、简历
//! - 访问统计与站点设置

pub mod analytics;
pub mod announcements;
pub mod auth;
pub mod authors;
pub mod error_code;
pub mod guestbook;
mod helpers;
pub mod posts;
pub mod profile;
pub mod qr;
pub mod resumes;
pub mod routes;
pub mod settings;
pub mod taxonomy;
mod types;
pub mod upload;

// 重新导出类型
pub use types::*;

// 重新导出帮助函数
pub use helpers::{
    CookieBuilder, api_deleted, api_found, api_result, created_response, error_from_linkfolio,
    error_response, json_response, success_response,
};

// 重新导出错误码
pub use error_code::ErrorCode;

pub use routes::admin_v1_routes;
