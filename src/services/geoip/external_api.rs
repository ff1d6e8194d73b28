//! GeoIP over HTTP (ip-api.com by default)

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{trace, warn};
use ureq::Agent;

use super::provider::GeoIpLookup;

const CACHE_TTL_SECS: u64 = 15 * 60;
const CACHE_CAPACITY: u64 = 10_000;
/// 在 /qr/{id} 请求内同步查询，会直接拖慢跳转；超时则记录为无国家码
const HTTP_TIMEOUT_SECS: u64 = 2;

fn agent() -> &'static Agent {
    static AGENT: OnceLock<Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .build()
            .into()
    })
}

/// Country code out of a lookup response
///
/// Understands ip-api.com (`status` + `countryCode`) as well as services
/// answering with `country_code` or a bare `country`.
pub(crate) fn parse_country(json: &serde_json::Value) -> Option<String> {
    if json.get("status").and_then(|v| v.as_str()) == Some("fail") {
        return None;
    }

    ["countryCode", "country_code", "country"]
        .iter()
        .find_map(|key| json.get(*key).and_then(|v| v.as_str()))
        .filter(|code| !code.is_empty())
        .map(str::to_string)
}

/// HTTP lookup against a templated URL, cached per IP
pub struct ExternalApiProvider {
    api_url_template: String,
    /// 查询失败（None）同样缓存，避免反复打外部服务
    cache: Cache<String, Option<String>>,
}

impl ExternalApiProvider {
    pub fn new(api_url_template: &str) -> Self {
        Self {
            api_url_template: api_url_template.to_string(),
            cache: Cache::builder()
                .time_to_live(Duration::from_secs(CACHE_TTL_SECS))
                .max_capacity(CACHE_CAPACITY)
                .build(),
        }
    }

    /// 阻塞 IO，只能在 spawn_blocking 中调用
    fn fetch_blocking(url: &str) -> Result<serde_json::Value, String> {
        agent()
            .get(url)
            .call()
            .map_err(|e| format!("request failed: {}", e))?
            .into_body()
            .read_json()
            .map_err(|e| format!("unreadable body: {}", e))
    }

    async fn fetch(url: String) -> Option<String> {
        trace!("GeoIP lookup {}", url);
        let joined = tokio::task::spawn_blocking(move || {
            Self::fetch_blocking(&url).map_err(|e| format!("{} ({})", e, url))
        })
        .await;

        match joined {
            Ok(Ok(json)) => parse_country(&json),
            Ok(Err(e)) => {
                warn!("GeoIP API {}", e);
                None
            }
            Err(e) => {
                warn!("GeoIP lookup task aborted: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl GeoIpLookup for ExternalApiProvider {
    async fn country(&self, ip: &str) -> Option<String> {
        let url = self.api_url_template.replace("{ip}", ip);
        // 同一 IP 的并发查询合并为一次请求
        self.cache.get_with(ip.to_string(), Self::fetch(url)).await
    }

    fn name(&self) -> &'static str {
        "ExternalAPI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_country_ip_api_format() {
        let body = json!({"status": "success", "countryCode": "DE"});
        assert_eq!(parse_country(&body), Some("DE".to_string()));
    }

    #[test]
    fn test_parse_country_fail_status() {
        let body = json!({"status": "fail", "message": "private range"});
        assert_eq!(parse_country(&body), None);
    }

    #[test]
    fn test_parse_country_alternate_fields() {
        assert_eq!(
            parse_country(&json!({"country_code": "JP"})),
            Some("JP".to_string())
        );
        assert_eq!(parse_country(&json!({"country": ""})), None);
        assert_eq!(parse_country(&json!({})), None);
    }

    #[tokio::test]
    #[ignore = "needs network"]
    async fn test_external_api_lookup_real() {
        let provider =
            ExternalApiProvider::new("http://ip-api.com/json/{ip}?fields=status,countryCode");
        assert_eq!(provider.country("8.8.8.8").await, Some("US".to_string()));
    }
}
