use std::str::FromStr;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::sqlx::SqlitePool;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, SqlxSqliteConnector};
use tracing::{debug, info};

use crate::errors::{LinkfolioError, Result};

/// SQLite：不存在时创建，WAL + 外键约束
pub async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| LinkfolioError::database_config(format!("invalid SQLite URL: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        // 扫码写入与后台统计并发时避免立即返回 SQLITE_BUSY
        .busy_timeout(Duration::from_secs(5))
        .pragma("temp_store", "memory")
        .pragma("cache_size", "-16000");

    let pool = SqlitePool::connect_with(options)
        .await
        .map_err(|e| LinkfolioError::database_connection(format!("SQLite: {}", e)))?;

    debug!("SQLite pool ready");
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// MySQL / MariaDB / PostgreSQL
pub async fn connect_generic(
    database_url: &str,
    backend_name: &str,
    pool_size: u32,
) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(pool_size)
        .min_connections(pool_size.min(2))
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(10 * 60))
        .sqlx_logging(false);

    Database::connect(options).await.map_err(|e| {
        LinkfolioError::database_connection(format!("{}: {}", backend_name.to_uppercase(), e))
    })
}

/// Applies every pending migration of the `migration` crate
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .map_err(|e| LinkfolioError::database_operation(format!("migration failed: {}", e)))?;
    info!("Database schema up to date");
    Ok(())
}
