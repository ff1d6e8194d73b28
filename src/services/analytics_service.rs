//! Page-visit tracking and the admin summary

use std::sync::Arc;

use tracing::debug;

use super::geoip::GeoIpProvider;
use super::visitor::VisitorContext;
use crate::errors::LinkfolioError;
use crate::storage::{AnalyticsSummary, NewPageVisit, PageVisit, SeaOrmStorage};
use crate::utils::client_info::{hash_ip, parse_user_agent};

pub const TOP_PAGES_LIMIT: u64 = 5;
pub const RECENT_VISITS_LIMIT: u64 = 10;

fn fill(slot: &mut Option<String>, value: impl FnOnce() -> Option<String>) {
    if slot.as_deref().is_none_or(str::is_empty) {
        *slot = value();
    }
}

/// Complete a client-reported visit with server-side request data
///
/// Client values win; only missing fields are derived.
pub async fn enrich_visit(
    mut visit: NewPageVisit,
    ctx: &VisitorContext,
    geoip: Option<&GeoIpProvider>,
) -> NewPageVisit {
    fill(&mut visit.user_agent, || {
        Some(ctx.user_agent.clone()).filter(|ua| !ua.is_empty())
    });
    fill(&mut visit.referrer, || ctx.referrer.clone());
    fill(&mut visit.ip_hash, || Some(hash_ip(&ctx.ip)));

    let info = parse_user_agent(visit.user_agent.as_deref().unwrap_or_default());
    fill(&mut visit.device, || Some(info.device));
    fill(&mut visit.browser, || Some(info.browser));
    fill(&mut visit.os, || Some(info.os));

    if visit.country.as_deref().is_none_or(str::is_empty) {
        visit.country = ctx.resolve_country(geoip).await;
    }
    visit
}

pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
}

impl AnalyticsService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn track(&self, visit: NewPageVisit) -> Result<PageVisit, LinkfolioError> {
        if visit.path.trim().is_empty() {
            return Err(LinkfolioError::validation("path is required"));
        }
        let stored = self.storage.insert_page_visit(&visit).await?;
        debug!("AnalyticsService: visit {} recorded", stored.path);
        Ok(stored)
    }

    pub async fn summary(&self) -> Result<AnalyticsSummary, LinkfolioError> {
        Ok(AnalyticsSummary {
            total_views: self.storage.count_page_visits().await?,
            unique_visitors: self.storage.count_unique_visitors().await?,
            top_pages: self.storage.top_pages(TOP_PAGES_LIMIT).await?,
            recent_visits: self.storage.recent_page_visits(RECENT_VISITS_LIMIT).await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> VisitorContext {
        VisitorContext {
            ip: "203.0.113.9".to_string(),
            user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0) Mobile Safari/604.1".to_string(),
            referrer: Some("https://news.example.com/".to_string()),
            header_country: Some("NL".to_string()),
        }
    }

    #[actix_rt::test]
    async fn test_enrich_fills_missing_fields() {
        let visit = NewPageVisit {
            path: "/blog".to_string(),
            ..Default::default()
        };
        let visit = enrich_visit(visit, &ctx(), None).await;
        assert_eq!(visit.ip_hash.as_deref(), Some(hash_ip("203.0.113.9").as_str()));
        assert_eq!(visit.device.as_deref(), Some("mobile"));
        assert_eq!(visit.browser.as_deref(), Some("Safari"));
        assert_eq!(visit.country.as_deref(), Some("NL"));
        assert_eq!(visit.referrer.as_deref(), Some("https://news.example.com/"));
    }

    #[actix_rt::test]
    async fn test_enrich_keeps_client_values() {
        let visit = NewPageVisit {
            path: "/".to_string(),
            user_agent: Some("Mozilla/5.0 (Windows NT 10.0) Firefox/120.0".to_string()),
            ip_hash: Some("clienthash".to_string()),
            country: Some("US".to_string()),
            ..Default::default()
        };
        let visit = enrich_visit(visit, &ctx(), None).await;
        assert_eq!(visit.ip_hash.as_deref(), Some("clienthash"));
        assert_eq!(visit.browser.as_deref(), Some("Firefox"));
        assert_eq!(visit.os.as_deref(), Some("Windows"));
        assert_eq!(visit.country.as_deref(), Some("US"));
    }
}
