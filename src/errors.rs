use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum LinkfolioError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    Serialization(String),
    Upstream(String),
    PasswordHash(String),
}

impl LinkfolioError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkfolioError::DatabaseConfig(_) => "E001",
            LinkfolioError::DatabaseConnection(_) => "E002",
            LinkfolioError::DatabaseOperation(_) => "E003",
            LinkfolioError::FileOperation(_) => "E004",
            LinkfolioError::Validation(_) => "E005",
            LinkfolioError::NotFound(_) => "E006",
            LinkfolioError::Conflict(_) => "E007",
            LinkfolioError::Unauthorized(_) => "E008",
            LinkfolioError::Forbidden(_) => "E009",
            LinkfolioError::Serialization(_) => "E010",
            LinkfolioError::Upstream(_) => "E011",
            LinkfolioError::PasswordHash(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkfolioError::DatabaseConfig(_) => "Database Configuration Error",
            LinkfolioError::DatabaseConnection(_) => "Database Connection Error",
            LinkfolioError::DatabaseOperation(_) => "Database Operation Error",
            LinkfolioError::FileOperation(_) => "File Operation Error",
            LinkfolioError::Validation(_) => "Validation Error",
            LinkfolioError::NotFound(_) => "Resource Not Found",
            LinkfolioError::Conflict(_) => "Resource Conflict",
            LinkfolioError::Unauthorized(_) => "Unauthorized",
            LinkfolioError::Forbidden(_) => "Forbidden",
            LinkfolioError::Serialization(_) => "Serialization Error",
            LinkfolioError::Upstream(_) => "Upstream Fetch Error",
            LinkfolioError::PasswordHash(_) => "Password Hash Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkfolioError::DatabaseConfig(msg)
            | LinkfolioError::DatabaseConnection(msg)
            | LinkfolioError::DatabaseOperation(msg)
            | LinkfolioError::FileOperation(msg)
            | LinkfolioError::Validation(msg)
            | LinkfolioError::NotFound(msg)
            | LinkfolioError::Conflict(msg)
            | LinkfolioError::Unauthorized(msg)
            | LinkfolioError::Forbidden(msg)
            | LinkfolioError::Serialization(msg)
            | LinkfolioError::Upstream(msg)
            | LinkfolioError::PasswordHash(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            LinkfolioError::Validation(_) => StatusCode::BAD_REQUEST,
            LinkfolioError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkfolioError::Conflict(_) => StatusCode::CONFLICT,
            LinkfolioError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            LinkfolioError::Forbidden(_) => StatusCode::FORBIDDEN,
            LinkfolioError::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    #[cfg(feature = "server")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkfolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkfolioError {}

// 便捷的构造函数
impl LinkfolioError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinkfolioError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkfolioError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkfolioError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkfolioError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkfolioError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkfolioError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        LinkfolioError::Conflict(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        LinkfolioError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        LinkfolioError::Forbidden(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkfolioError::Serialization(msg.into())
    }

    pub fn upstream<T: Into<String>>(msg: T) -> Self {
        LinkfolioError::Upstream(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        LinkfolioError::PasswordHash(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LinkfolioError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkfolioError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LinkfolioError {
    fn from(err: std::io::Error) -> Self {
        LinkfolioError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkfolioError {
    fn from(err: serde_json::Error) -> Self {
        LinkfolioError::Serialization(err.to_string())
    }
}

impl From<crate::utils::password::PasswordError> for LinkfolioError {
    fn from(err: crate::utils::password::PasswordError) -> Self {
        LinkfolioError::PasswordHash(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkfolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            LinkfolioError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            LinkfolioError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            LinkfolioError::conflict("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            LinkfolioError::upstream("x").http_status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            LinkfolioError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_format_simple() {
        let err = LinkfolioError::not_found("Post not found: hello");
        assert_eq!(err.format_simple(), "Resource Not Found: Post not found: hello");
        assert_eq!(err.to_string(), err.format_simple());
        assert_eq!(err.code(), "E006");
    }

    #[test]
    fn test_from_db_err() {
        let err: LinkfolioError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, LinkfolioError::DatabaseOperation(_)));
    }
}
