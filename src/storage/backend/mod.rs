//! SeaORM storage backend
//!
//! One pooled connection shared by every service. SQLite, MySQL/MariaDB and
//! PostgreSQL are supported; the backend is inferred from the URL.

mod accounts;
mod analytics;
mod announcements;
mod connection;
pub mod converters;
mod guestbook;
mod posts;
mod profiles;
mod qr;
mod resumes;
pub mod retry;
mod taxonomy;

use std::time::Duration;

use moka::sync::Cache;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::errors::{LinkfolioError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};
pub use posts::PostCounter;

/// URL scheme → backend name
const SCHEMES: &[(&str, &str)] = &[
    ("sqlite://", "sqlite"),
    ("mysql://", "mysql"),
    ("mariadb://", "mysql"),
    ("postgres://", "postgres"),
    ("postgresql://", "postgres"),
];

/// `sqlite`, `mysql` or `postgres`; bare `*.db` / `*.sqlite` paths count as SQLite
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    let by_scheme = SCHEMES
        .iter()
        .find(|(scheme, _)| database_url.starts_with(scheme))
        .map(|(_, backend)| *backend);
    let by_path = (database_url == ":memory:"
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite"))
    .then_some("sqlite");

    by_scheme.or(by_path).map(str::to_string).ok_or_else(|| {
        LinkfolioError::database_config(format!(
            "unsupported database URL '{}' (expected sqlite://, mysql://, mariadb:// or postgres://)",
            database_url
        ))
    })
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    /// 文章列表 COUNT 缓存（TTL 30秒）
    count_cache: Cache<String, u64>,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    /// 连接数据库并运行迁移
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        if database_url.is_empty() {
            return Err(LinkfolioError::database_config("DATABASE_URL 未设置"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(database_url).await?
        } else {
            let pool_size = crate::config::get_config().database.pool_size;
            connect_generic(database_url, backend_name, pool_size).await?
        };

        run_migrations(&db).await?;

        let retry_config = crate::config::try_get_config()
            .map(|config| retry::RetryConfig::from(&config.database))
            .unwrap_or_default();

        let storage = Self::from_connection(db, backend_name, retry_config);
        info!("{} storage initialized", backend_name.to_uppercase());
        Ok(storage)
    }

    /// 包装一个已迁移的连接（测试与 CLI 使用）
    pub fn from_connection(
        db: DatabaseConnection,
        backend_name: &str,
        retry_config: retry::RetryConfig,
    ) -> Self {
        SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            count_cache: Cache::builder()
                .time_to_live(Duration::from_secs(30))
                .max_capacity(100)
                .build(),
            retry_config,
        }
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 检查连接是否可用
    pub async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| LinkfolioError::database_connection(format!("ping failed: {}", e)))
    }

    /// 清除分页 COUNT 缓存（文章变更时调用）
    pub fn invalidate_count_cache(&self) {
        self.count_cache.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://data.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("linkfolio.db").unwrap(), "sqlite");
        assert_eq!(
            infer_backend_from_url("mariadb://u:p@localhost/db").unwrap(),
            "mysql"
        );
        assert_eq!(
            infer_backend_from_url("postgresql://localhost/db").unwrap(),
            "postgres"
        );
        assert!(infer_backend_from_url("redis://localhost").is_err());
    }
}
