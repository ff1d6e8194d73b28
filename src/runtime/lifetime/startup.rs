use crate::api::app_state::AppServices;
use crate::services::{AccountService, GeoIpProvider};
use crate::storage::{SeaOrmStorage, StorageFactory};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub services: AppServices,
}

/// 准备服务器启动的上下文
///
/// 包括存储连接与迁移、默认管理员、GeoIP 提供者和全部 service。
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    // 多个 rustls 后端同时存在时需要显式选择
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let config = crate::config::get_config();

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    // 首次启动时创建默认管理员
    AccountService::new(storage.clone())
        .ensure_admin_exists(&config.admin)
        .await
        .context("Failed to ensure default admin account")?;

    let geoip = GeoIpProvider::from_config(&config.analytics);
    match &geoip {
        Some(provider) => info!("GeoIP lookup enabled ({})", provider.provider_name()),
        None => debug!("GeoIP lookup disabled"),
    }

    let services = AppServices::new(storage.clone(), &config.site, geoip);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext { storage, services })
}
