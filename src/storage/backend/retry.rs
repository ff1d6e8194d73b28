//! Retry for transient database failures
//!
//! Only the scan hot path (QR lookup, scan insert, counter bump) and post
//! lookups go through here. Anything not listed as transient fails at once;
//! writes additionally give up when the connection drops mid-statement.

use std::future::Future;
use std::ops::Deref;
use std::time::Duration;

use sea_orm::DbErr;
use sea_orm::error::RuntimeErr;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;

/// MySQL 1213/1205, PostgreSQL 40001/40P01, SQLite BUSY(5)/LOCKED(6)
const TRANSIENT_CODES: &[&str] = &["1213", "1205", "40001", "40P01", "5", "6"];

const TRANSIENT_MESSAGES: &[&str] = &[
    "deadlock",
    "lock wait timeout",
    "database is locked",
    "serialization failure",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl From<&DatabaseConfig> for RetryConfig {
    fn from(db: &DatabaseConfig) -> Self {
        Self {
            max_retries: db.retry_count,
            base_delay_ms: db.retry_base_delay_ms,
            max_delay_ms: db.retry_max_delay_ms,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based): doubled each time,
    /// capped, plus up to 25% jitter
    fn delay(&self, attempt: u32) -> Duration {
        let doubled = self
            .base_delay_ms
            .saturating_mul(1u64 << attempt.saturating_sub(1).min(32));
        let capped = doubled.min(self.max_delay_ms);
        let jitter = rand::random_range(0..=capped / 4);
        Duration::from_millis(capped + jitter)
    }
}

fn message_is_transient(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    TRANSIENT_MESSAGES.iter().any(|m| msg.contains(m))
}

fn runtime_is_transient(err: &RuntimeErr) -> bool {
    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            let code = sqlx_err
                .deref()
                .as_database_error()
                .and_then(|db_err| db_err.code().map(|c| c.into_owned()));
            match code {
                Some(code) => TRANSIENT_CODES.contains(&code.as_str()),
                None => message_is_transient(&sqlx_err.to_string()),
            }
        }
        RuntimeErr::Internal(msg) => message_is_transient(msg),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

/// Connection problems, deadlocks and lock timeouts
pub fn is_retryable_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Exec(e) | DbErr::Query(e) => runtime_is_transient(e),
        _ => false,
    }
}

/// Failures after which a write is known not to have been applied
///
/// A dropped connection (`DbErr::Conn`) is excluded: the statement may have
/// committed before the reply was lost.
pub fn is_unapplied_write_error(err: &DbErr) -> bool {
    !matches!(err, DbErr::Conn(_)) && is_retryable_error(err)
}

/// Read path: run `op` until it succeeds, fails permanently, or retries run out
pub async fn with_retry<T, F, Fut>(label: &str, config: RetryConfig, op: F) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    retry_while(label, config, is_retryable_error, op).await
}

/// Non-idempotent writes (scan insert, counter bump)
pub async fn with_write_retry<T, F, Fut>(
    label: &str,
    config: RetryConfig,
    op: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    retry_while(label, config, is_unapplied_write_error, op).await
}

async fn retry_while<T, F, Fut>(
    label: &str,
    config: RetryConfig,
    should_retry: fn(&DbErr) -> bool,
    mut op: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut retries = 0;
    loop {
        let err = match op().await {
            Ok(value) => {
                if retries > 0 {
                    debug!("{}: ok after {} retries", label, retries);
                }
                return Ok(value);
            }
            Err(e) => e,
        };

        if retries >= config.max_retries || !should_retry(&err) {
            return Err(err);
        }

        retries += 1;
        let wait = config.delay(retries);
        warn!(
            "{}: transient database error ({}), retry {}/{} in {:?}",
            label, err, retries, config.max_retries, wait
        );
        tokio::time::sleep(wait).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::error::ConnAcquireErr;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig {
            max_retries: 2,
            base_delay_ms: 5,
            max_delay_ms: 20,
        }
    }

    #[test]
    fn test_transient_classification() {
        assert!(is_retryable_error(&DbErr::ConnectionAcquire(
            ConnAcquireErr::Timeout
        )));
        assert!(is_retryable_error(&DbErr::Exec(RuntimeErr::Internal(
            "database is locked".to_string()
        ))));
        assert!(is_retryable_error(&DbErr::Query(RuntimeErr::Internal(
            "Deadlock found when trying to get lock".to_string()
        ))));
        assert!(!is_retryable_error(&DbErr::RecordNotFound(
            "qr_codes".to_string()
        )));
        assert!(!is_retryable_error(&DbErr::Exec(RuntimeErr::Internal(
            "UNIQUE constraint failed: qr_codes.qr_id".to_string()
        ))));
    }

    #[test]
    fn test_delay_doubles_and_caps() {
        let config = RetryConfig::default();
        let first = config.delay(1).as_millis();
        assert!((100..=125).contains(&first));
        let third = config.delay(3).as_millis();
        assert!((400..=500).contains(&third));
        let late = config.delay(20).as_millis();
        assert!((2000..=2500).contains(&late));
    }

    #[tokio::test]
    async fn test_lookup_recovers_from_busy() {
        let calls = AtomicU32::new(0);
        let result = with_retry("find_post_by_slug", fast(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(DbErr::Exec(RuntimeErr::Internal(
                        "database is locked".to_string(),
                    )))
                } else {
                    Ok(7_i64)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry("find_active_qr", fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout)) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_write_classification() {
        let lost = DbErr::Conn(RuntimeErr::Internal("connection reset by peer".to_string()));
        assert!(is_retryable_error(&lost));
        assert!(!is_unapplied_write_error(&lost));
        assert!(is_unapplied_write_error(&DbErr::ConnectionAcquire(
            ConnAcquireErr::Timeout
        )));
        assert!(is_unapplied_write_error(&DbErr::Exec(RuntimeErr::Internal(
            "database is locked".to_string()
        ))));
    }

    #[tokio::test]
    async fn test_write_not_repeated_after_lost_connection() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_write_retry("increment_scan_count", fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(DbErr::Conn(RuntimeErr::Internal(
                    "connection reset by peer".to_string(),
                )))
            }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_write_retried_when_pool_exhausted() {
        let calls = AtomicU32::new(0);
        let result = with_write_retry("insert_scan", fast(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout))
                } else {
                    Ok(())
                }
            }
        })
        .await;
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry("find_qr_by_qr_id", fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DbErr::RecordNotFound("missing".to_string())) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
