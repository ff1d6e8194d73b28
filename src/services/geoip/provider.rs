//! Country lookup for scan and visit records

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::external_api::ExternalApiProvider;
use super::maxmind::MaxMindProvider;
use crate::config::AnalyticsConfig;

#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    /// ISO 3166-1 alpha-2 国家代码 (e.g., "CN", "US")
    async fn country(&self, ip: &str) -> Option<String>;

    fn name(&self) -> &'static str;
}

/// Cloneable handle over whichever lookup backend is configured
#[derive(Clone)]
pub struct GeoIpProvider {
    inner: Arc<dyn GeoIpLookup>,
}

impl GeoIpProvider {
    /// `None` while `enable_geo_lookup` is off
    pub fn from_config(config: &AnalyticsConfig) -> Option<Self> {
        if !config.enable_geo_lookup {
            return None;
        }

        let inner: Arc<dyn GeoIpLookup> = match Self::open_database(config) {
            Some(db) => db,
            None => Arc::new(ExternalApiProvider::new(&config.geoip_api_url)),
        };
        info!("GeoIP lookups via {}", inner.name());
        Some(Self::with_lookup(inner))
    }

    /// 本地 mmdb 优先，打不开时回退到外部 API
    fn open_database(config: &AnalyticsConfig) -> Option<Arc<dyn GeoIpLookup>> {
        let path = config.maxminddb_path.as_deref()?;
        match MaxMindProvider::new(path) {
            Ok(db) => Some(Arc::new(db) as Arc<dyn GeoIpLookup>),
            Err(e) => {
                warn!("GeoIP database {} unusable ({}), using external API", path, e);
                None
            }
        }
    }

    /// Wrap any backend, e.g. a fixed lookup in tests
    pub fn with_lookup(inner: Arc<dyn GeoIpLookup>) -> Self {
        Self { inner }
    }

    pub async fn country(&self, ip: &str) -> Option<String> {
        self.inner.country(ip).await
    }

    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}
