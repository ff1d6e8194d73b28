//! Health checks; they read storage directly and skip the service layer

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, error};

use crate::api::app_state::AppStartTime;
use crate::api::services::admin::{
    ErrorCode, HealthChecks, HealthResponse, HealthStorageCheck, json_response,
};
use crate::storage::SeaOrmStorage;

/// `2d 3h 4m 5s`; leading zero units are dropped
pub fn format_uptime(seconds: u64) -> String {
    let units = [
        (seconds / 86_400, "d"),
        ((seconds % 86_400) / 3_600, "h"),
        ((seconds % 3_600) / 60, "m"),
    ];
    let mut parts: Vec<String> = units
        .iter()
        .skip_while(|(value, _)| *value == 0)
        .map(|(value, unit)| format!("{}{}", value, unit))
        .collect();
    parts.push(format!("{}s", seconds % 60));
    parts.join(" ")
}

const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Database ping bounded by [`PING_TIMEOUT`]
async fn check_storage(storage: &SeaOrmStorage) -> HealthStorageCheck {
    let failure = match tokio::time::timeout(PING_TIMEOUT, storage.ping()).await {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(format!("database error: {}", e)),
        Err(_) => Some("timeout".to_string()),
    };
    if let Some(reason) = &failure {
        error!("Storage health check failed: {}", reason);
    }

    HealthStorageCheck {
        status: if failure.is_none() { "healthy" } else { "unhealthy" }.to_string(),
        backend: storage.backend_name().to_string(),
        error: failure,
    }
}

/// `/health`, `/health/ready`, `/health/live`
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<SeaOrmStorage>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let started = Instant::now();
        let storage_check = check_storage(&storage).await;
        let healthy = storage_check.error.is_none();

        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;
        let report = HealthResponse {
            status: storage_check.status.clone(),
            timestamp: now.to_rfc3339(),
            uptime,
            checks: HealthChecks {
                storage: storage_check,
            },
            response_time_ms: started.elapsed().as_millis() as u64,
        };

        debug!(
            "Health check: {} in {:?}, up {}",
            report.status,
            started.elapsed(),
            format_uptime(uptime)
        );

        if healthy {
            json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(report))
        } else {
            json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
                Some(report),
            )
        }
    }

    /// 进程已能处理请求
    pub async fn readiness_check() -> impl Responder {
        HttpResponse::Ok().content_type("text/plain").body("OK")
    }

    pub async fn liveness_check() -> impl Responder {
        HttpResponse::NoContent().finish()
    }
}

pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(5), "5s");
        assert_eq!(format_uptime(65), "1m 5s");
        assert_eq!(format_uptime(3_661), "1h 1m 1s");
        assert_eq!(format_uptime(90_061), "1d 1h 1m 1s");
        assert_eq!(format_uptime(86_400), "1d 0h 0m 0s");
    }
}
