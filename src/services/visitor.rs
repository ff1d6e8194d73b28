//! Visitor metadata captured at the HTTP edge
//!
//! Shared by QR scan recording and page-visit tracking.

use actix_web::HttpRequest;
use actix_web::http::header;

use super::geoip::GeoIpProvider;
use crate::storage::ScanMetadata;
use crate::utils::client_info::{hash_ip, parse_user_agent};
use crate::utils::ip::{UNKNOWN_IP, is_private_or_local, visitor_ip};

/// Country headers set by common edge proxies, checked in order
const COUNTRY_HEADERS: [&str; 2] = ["cf-ipcountry", "x-vercel-ip-country"];

/// Raw request data for one visitor
#[derive(Debug, Clone, Default)]
pub struct VisitorContext {
    /// First `X-Forwarded-For` entry or `unknown`
    pub ip: String,
    pub user_agent: String,
    pub referrer: Option<String>,
    pub header_country: Option<String>,
}

impl VisitorContext {
    pub fn from_request(req: &HttpRequest) -> Self {
        let headers = req.headers();
        let header_str = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let header_country = COUNTRY_HEADERS.iter().find_map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                // Cloudflare 用 XX 表示未知
                .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("xx"))
                .map(str::to_uppercase)
        });

        Self {
            ip: visitor_ip(headers),
            user_agent: header_str(header::USER_AGENT).unwrap_or_default(),
            referrer: header_str(header::REFERER).filter(|r| !r.is_empty()),
            header_country,
        }
    }

    /// Country from proxy headers, else GeoIP for public addresses
    pub async fn resolve_country(&self, geoip: Option<&GeoIpProvider>) -> Option<String> {
        if self.header_country.is_some() {
            return self.header_country.clone();
        }

        let geoip = geoip?;
        if self.ip == UNKNOWN_IP {
            return None;
        }
        match self.ip.parse::<std::net::IpAddr>() {
            Ok(addr) if !is_private_or_local(&addr) => geoip.country(&self.ip).await,
            _ => None,
        }
    }

    /// Scan row payload (IP hashed, UA classified)
    pub async fn scan_metadata(&self, geoip: Option<&GeoIpProvider>) -> ScanMetadata {
        let info = parse_user_agent(&self.user_agent);
        ScanMetadata {
            ip_hash: hash_ip(&self.ip),
            user_agent: self.user_agent.clone(),
            device: info.device,
            browser: info.browser,
            os: info.os,
            country: self.resolve_country(geoip).await,
            referrer: self.referrer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_rt::test]
    async fn test_context_from_headers() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "198.51.100.4, 10.0.0.2"))
            .insert_header(("user-agent", "Mozilla/5.0 (Windows NT 10.0) Firefox/121.0"))
            .insert_header(("referer", "https://example.com/"))
            .insert_header(("cf-ipcountry", "de"))
            .to_http_request();

        let ctx = VisitorContext::from_request(&req);
        assert_eq!(ctx.ip, "198.51.100.4");
        assert_eq!(ctx.referrer.as_deref(), Some("https://example.com/"));
        assert_eq!(ctx.header_country.as_deref(), Some("DE"));

        let meta = ctx.scan_metadata(None).await;
        assert_eq!(meta.ip_hash, hash_ip("198.51.100.4"));
        assert_eq!(meta.browser, "Firefox");
        assert_eq!(meta.os, "Windows");
        assert_eq!(meta.country.as_deref(), Some("DE"));
    }

    #[actix_rt::test]
    async fn test_context_without_headers() {
        let req = TestRequest::default().to_http_request();
        let ctx = VisitorContext::from_request(&req);
        assert_eq!(ctx.ip, UNKNOWN_IP);
        assert_eq!(ctx.user_agent, "");
        assert!(ctx.referrer.is_none());

        let meta = ctx.scan_metadata(None).await;
        assert_eq!(meta.ip_hash, hash_ip("unknown"));
        assert_eq!(meta.device, "desktop");
        assert!(meta.country.is_none());
    }

    #[actix_rt::test]
    async fn test_vercel_country_and_unknown_marker() {
        let req = TestRequest::default()
            .insert_header(("cf-ipcountry", "XX"))
            .insert_header(("x-vercel-ip-country", "FR"))
            .to_http_request();
        let ctx = VisitorContext::from_request(&req);
        assert_eq!(ctx.header_country.as_deref(), Some("FR"));
    }
}
