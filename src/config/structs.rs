use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// SameSite attribute of the auth cookies
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "PascalCase")]
#[strum(ascii_case_insensitive)]
pub enum SameSitePolicy {
    Strict,
    #[default]
    Lax,
    None,
}

/// Startup configuration
///
/// Layered as: built-in defaults < `config.toml` < `LF__SECTION__KEY`
/// environment variables. Every section and field is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StaticConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub site: SiteConfig,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
    pub cors: CorsConfig,
    pub analytics: AnalyticsConfig,
}

impl StaticConfig {
    pub fn load() -> Self {
        Self::load_from("config.toml")
    }

    /// 配置错误时回退到默认值（日志尚未初始化，只能写 stderr）
    pub fn load_from(path: &str) -> Self {
        use config::{Config, Environment, File};

        let loaded = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("LF")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .and_then(|settings| settings.try_deserialize::<StaticConfig>());

        match loaded {
            Ok(config) => {
                if Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] Invalid configuration ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Default configuration rendered as TOML
    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|e| format!("# failed to render sample config: {}", e))
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cpu_count: usize,
    /// 可信反向代理（IP 或 CIDR），登录限流时使用其 X-Forwarded-For
    pub trusted_proxies: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cpu_count: num_cpus::get(),
            trusted_proxies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlite://, mysql://, mariadb:// or postgres://
    pub database_url: String,
    pub pool_size: u32,
    /// 扫码热路径上的瞬时错误重试
    pub retry_count: u32,
    pub retry_base_delay_ms: u64,
    pub retry_max_delay_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://linkfolio.db".to_string(),
            pool_size: 10,
            retry_count: 3,
            retry_base_delay_ms: 100,
            retry_max_delay_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
    pub file: Option<String>,
    pub max_backups: u32,
    pub enable_rotation: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            file: None,
            max_backups: 5,
            enable_rotation: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// 对外访问的站点根地址，用于生成 /qr/{id} 与 /me/{code} 链接
    pub url: String,
    pub settings_file: String,
    pub upload_dir: String,
    pub upload_url_prefix: String,
    pub max_upload_bytes: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:5173".to_string(),
            settings_file: "site-settings.json".to_string(),
            upload_dir: "uploads".to_string(),
            upload_url_prefix: "/uploads".to_string(),
            max_upload_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// 为空时启动时生成随机密钥（重启后已签发 token 失效）
    pub jwt_secret: String,
    pub access_token_minutes: u64,
    pub refresh_token_days: u64,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSitePolicy,
    pub cookie_domain: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_minutes: 60,
            refresh_token_days: 7,
            cookie_secure: false,
            cookie_same_site: SameSitePolicy::Lax,
            cookie_domain: None,
        }
    }
}

/// Account seeded when the admins table is empty
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub default_username: String,
    /// Plain text or an Argon2 PHC string
    pub default_password: String,
    pub default_email: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            default_username: "admin".to_string(),
            default_password: "admin".to_string(),
            default_email: "admin@example.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
    pub max_age: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            allowed_origins: Vec::new(),
            allow_credentials: false,
            max_age: 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// 是否对公网 IP 做 GeoIP 查询（请求头已带国家码时不查询）
    pub enable_geo_lookup: bool,
    /// GeoLite2-Country.mmdb / GeoLite2-City.mmdb
    pub maxminddb_path: Option<String>,
    /// 外部 API 兜底，`{ip}` 为占位符
    pub geoip_api_url: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enable_geo_lookup: false,
            maxminddb_path: None,
            geoip_api_url: "http://ip-api.com/json/{ip}?fields=status,countryCode".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.site.url, "http://localhost:5173");
        assert_eq!(config.site.settings_file, "site-settings.json");
        assert_eq!(config.admin.default_username, "admin");
        assert_eq!(config.auth.cookie_same_site, SameSitePolicy::Lax);
        assert!(!config.analytics.enable_geo_lookup);
    }

    #[test]
    fn test_sample_config_round_trips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[server]"));
        assert!(sample.contains("[site]"));

        let parsed: StaticConfig = toml::from_str(&sample).expect("sample config should parse");
        assert_eq!(parsed.site.upload_dir, "uploads");
        assert_eq!(parsed.auth.access_token_minutes, 60);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StaticConfig = toml::from_str(
            r#"
            [site]
            url = "https://yahya.dev"
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(parsed.site.url, "https://yahya.dev");
        assert_eq!(parsed.site.settings_file, "site-settings.json");
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.database.retry_count, 3);
    }

    #[test]
    fn test_same_site_from_str() {
        assert_eq!("strict".parse::<SameSitePolicy>(), Ok(SameSitePolicy::Strict));
        assert_eq!("NONE".parse::<SameSitePolicy>(), Ok(SameSitePolicy::None));
        assert!("sideways".parse::<SameSitePolicy>().is_err());
        assert_eq!(SameSitePolicy::Lax.to_string(), "Lax");
    }
}
