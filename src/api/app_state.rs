//! Shared service registry
//!
//! Every service is built once and handed to actix as `web::Data`; the HTTP
//! server and the integration tests register the same set.

use std::sync::Arc;

use actix_web::web;

use crate::config::SiteConfig;
use crate::services::{
    AccountService, AnalyticsService, AnnouncementService, GeoIpProvider, GuestbookService,
    PostService, ProfileService, QrService, ResumeService, SiteSettingsStore, TaxonomyService,
};
use crate::storage::SeaOrmStorage;

/// 应用启动时间
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// Where uploaded images go and how they are addressed
#[derive(Clone, Debug)]
pub struct UploadSettings {
    pub upload_dir: String,
    pub url_prefix: String,
    pub max_bytes: usize,
}

impl From<&SiteConfig> for UploadSettings {
    fn from(site: &SiteConfig) -> Self {
        Self {
            upload_dir: site.upload_dir.clone(),
            url_prefix: site.upload_url_prefix.clone(),
            max_bytes: site.max_upload_bytes,
        }
    }
}

#[derive(Clone)]
pub struct AppServices {
    pub storage: Arc<SeaOrmStorage>,
    pub qr: web::Data<QrService>,
    pub profiles: web::Data<ProfileService>,
    pub posts: web::Data<PostService>,
    pub taxonomy: web::Data<TaxonomyService>,
    pub accounts: web::Data<AccountService>,
    pub guestbook: web::Data<GuestbookService>,
    pub analytics: web::Data<AnalyticsService>,
    pub announcements: web::Data<AnnouncementService>,
    pub resumes: web::Data<ResumeService>,
    pub settings: web::Data<SiteSettingsStore>,
    pub uploads: web::Data<UploadSettings>,
    pub geoip: Option<web::Data<GeoIpProvider>>,
    pub start_time: web::Data<AppStartTime>,
}

impl AppServices {
    pub fn new(storage: Arc<SeaOrmStorage>, site: &SiteConfig, geoip: Option<GeoIpProvider>) -> Self {
        Self {
            qr: web::Data::new(QrService::new(storage.clone(), &site.url)),
            profiles: web::Data::new(ProfileService::new(storage.clone(), &site.url)),
            posts: web::Data::new(PostService::new(storage.clone())),
            taxonomy: web::Data::new(TaxonomyService::new(storage.clone())),
            accounts: web::Data::new(AccountService::new(storage.clone())),
            guestbook: web::Data::new(GuestbookService::new(storage.clone())),
            analytics: web::Data::new(AnalyticsService::new(storage.clone())),
            announcements: web::Data::new(AnnouncementService::new(storage.clone())),
            resumes: web::Data::new(ResumeService::new(storage.clone())),
            settings: web::Data::new(SiteSettingsStore::new(&site.settings_file)),
            uploads: web::Data::new(UploadSettings::from(site)),
            geoip: geoip.map(web::Data::new),
            start_time: web::Data::new(AppStartTime {
                start_datetime: chrono::Utc::now(),
            }),
            storage,
        }
    }

    /// Attach every service to an `App` (or a test `App`)
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.storage.clone()))
            .app_data(self.qr.clone())
            .app_data(self.profiles.clone())
            .app_data(self.posts.clone())
            .app_data(self.taxonomy.clone())
            .app_data(self.accounts.clone())
            .app_data(self.guestbook.clone())
            .app_data(self.analytics.clone())
            .app_data(self.announcements.clone())
            .app_data(self.resumes.clone())
            .app_data(self.settings.clone())
            .app_data(self.uploads.clone())
            .app_data(self.start_time.clone());
        if let Some(geoip) = &self.geoip {
            cfg.app_data(geoip.clone());
        }
    }
}
