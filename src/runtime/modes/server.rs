//! HTTP server mode

use std::time::Duration;

use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, web};
use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::api::services::configure_routes;
use crate::config::CorsConfig;
use crate::runtime::lifetime;

/// JSON bodies (posts, resumes, settings) stay well under this
const JSON_LIMIT: usize = 1024 * 1024;
/// multipart 边界与表单字段的额外余量
const MULTIPART_OVERHEAD: usize = 64 * 1024;

fn allows_any_origin(cors: &CorsConfig) -> bool {
    cors.allowed_origins.iter().any(|o| o == "*")
}

/// 启动时检查一次 CORS 配置，仅输出日志
fn check_cors_config(cors: &CorsConfig) {
    if !cors.enabled {
        return;
    }
    if cors.allowed_origins.is_empty() {
        warn!("CORS is enabled with no allowed_origins; cross-origin requests will be refused");
    }
    if allows_any_origin(cors) && cors.allow_credentials {
        error!("CORS: '*' cannot be combined with allow_credentials; credentials disabled");
    }
}

/// Same-origin only unless `[cors] enabled = true`
pub fn build_cors_middleware(config: &CorsConfig) -> Cors {
    if !config.enabled {
        return Cors::default();
    }

    let any_origin = allows_any_origin(config);
    let cors = Cors::default()
        .allowed_methods(["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(config.max_age as usize);

    let cors = if any_origin {
        cors.allow_any_origin()
    } else {
        config
            .allowed_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    };

    if config.allow_credentials && !any_origin {
        cors.supports_credentials()
    } else {
        cors
    }
}

/// Serve until the listener fails or a shutdown signal arrives
///
/// Logging must already be initialized.
pub async fn run_server() -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup()
        .await
        .inspect_err(|e| error!("Server startup failed: {}", e))?;

    let config = crate::config::get_config();
    let services = startup.services.clone();
    let db = startup.storage.get_db().clone();

    let workers = config.server.cpu_count.clamp(1, 32);
    let cors_config = config.cors.clone();
    check_cors_config(&cors_config);

    if config.server.trusted_proxies.is_empty() {
        info!("No trusted proxies configured; login limiter keys on the socket address");
    }

    let payload_limit = config.site.max_upload_bytes.max(JSON_LIMIT) + MULTIPART_OVERHEAD;

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors_middleware(&cors_config))
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .app_data(web::PayloadConfig::new(payload_limit))
            .app_data(web::JsonConfig::default().limit(JSON_LIMIT))
            .configure(|cfg| services.register(cfg))
            .configure(configure_routes)
    })
    .workers(workers)
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_secs(5))
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    warn!("Listening on http://{} with {} workers", bind_address, workers);

    tokio::select! {
        res = server => res?,
        _ = lifetime::shutdown::listen_for_shutdown(&db) => {
            warn!("Shutdown complete");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cors(enabled: bool, origins: &[&str], credentials: bool) -> CorsConfig {
        CorsConfig {
            enabled,
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            allow_credentials: credentials,
            max_age: 3600,
        }
    }

    #[test]
    fn test_any_origin_detection() {
        assert!(allows_any_origin(&cors(true, &["*"], true)));
        assert!(!allows_any_origin(&cors(true, &["https://yahya.dev"], true)));
    }

    #[test]
    fn test_build_cors_variants() {
        let _ = build_cors_middleware(&cors(false, &[], false));
        let _ = build_cors_middleware(&cors(true, &["https://yahya.dev"], true));
        let _ = build_cors_middleware(&cors(true, &["*"], true));
    }
}
