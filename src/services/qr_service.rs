//! QR issuance, scan recording and stats
//!
//! A profile owns an append-only history of QR codes; regeneration flips the
//! previous codes inactive and issues a new one. Each scan writes one row and
//! bumps the parent's `total_scans` counter.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, Utc};
use tracing::{info, warn};

use crate::errors::LinkfolioError;
use crate::storage::{QrCode, QrScan, QrStats, QrWithScans, ScanMetadata, SeaOrmStorage};
use crate::utils::generate_from_alphabet;

/// Alphabet for public QR identifiers
pub const QR_ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
pub const QR_ID_LENGTH: usize = 8;
pub const DEFAULT_QR_THEME: &str = "light";
/// Scans returned alongside the active code
pub const RECENT_SCANS_LIMIT: u64 = 10;

/// 8 characters from `[a-z0-9]`, not cryptographically secured
pub fn generate_qr_id() -> String {
    generate_from_alphabet(QR_ID_ALPHABET, QR_ID_LENGTH)
}

/// 8 random bytes as 16 lowercase hex characters
pub fn generate_session_id() -> String {
    hex::encode(rand::random::<[u8; 8]>())
}

/// Local midnight today, as UTC
fn start_of_today() -> DateTime<Utc> {
    let now = Local::now();
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|midnight| midnight.with_timezone(&Utc))
        // DST 跳过午夜时退回到 24 小时前
        .unwrap_or_else(|| (now - Duration::hours(24)).with_timezone(&Utc))
}

pub struct QrService {
    storage: Arc<SeaOrmStorage>,
    site_url: String,
}

impl QrService {
    pub fn new(storage: Arc<SeaOrmStorage>, site_url: impl Into<String>) -> Self {
        Self {
            storage,
            site_url: site_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Public scan URL for an identifier
    pub fn qr_url(&self, qr_id: &str) -> String {
        format!("{}/qr/{}", self.site_url, qr_id)
    }

    /// 简历二维码指向的公开 PDF 地址
    pub fn resume_pdf_url(&self, resume_id: &str) -> String {
        format!("{}/resume/{}/pdf", self.site_url, resume_id)
    }

    /// Persist a new active code for the profile
    ///
    /// A `qr_id` collision surfaces as a database error from the unique index.
    pub async fn create_qr(
        &self,
        profile_id: &str,
        qr_code_url: Option<String>,
        qr_theme: Option<String>,
    ) -> Result<QrCode, LinkfolioError> {
        let now = Utc::now();
        let qr = QrCode {
            id: uuid::Uuid::new_v4().to_string(),
            qr_id: generate_qr_id(),
            profile_id: profile_id.to_string(),
            qr_code_url: qr_code_url.filter(|u| !u.is_empty()),
            qr_theme: qr_theme
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_QR_THEME.to_string()),
            is_active: true,
            total_scans: 0,
            created_at: now,
            updated_at: now,
        };

        self.storage.insert_qr_code(&qr).await?;
        info!("QrService: issued '{}' for profile {}", qr.qr_id, profile_id);
        Ok(qr)
    }

    /// Deactivate every active code of the profile, then issue a new one
    ///
    /// Two independent writes: a failure between them leaves no active code.
    pub async fn regenerate_qr(
        &self,
        profile_id: &str,
        qr_code_url: Option<String>,
        qr_theme: Option<String>,
    ) -> Result<QrCode, LinkfolioError> {
        let deactivated = self.storage.deactivate_profile_qrs(profile_id).await?;
        let qr = self.create_qr(profile_id, qr_code_url, qr_theme).await?;
        info!(
            "QrService: regenerated QR for profile {} ({} deactivated)",
            profile_id, deactivated
        );
        Ok(qr)
    }

    /// Active code plus its most recent scans
    pub async fn get_active_qr(
        &self,
        profile_id: &str,
    ) -> Result<Option<QrWithScans>, LinkfolioError> {
        let Some(qr) = self.storage.find_active_qr(profile_id).await? else {
            return Ok(None);
        };
        let scans = self.storage.recent_scans(&qr.id, RECENT_SCANS_LIMIT).await?;
        Ok(Some(QrWithScans { qr, scans }))
    }

    /// Lookup by public identifier, active or not
    pub async fn get_qr_by_qr_id(&self, qr_id: &str) -> Result<Option<QrCode>, LinkfolioError> {
        self.storage.find_qr_by_qr_id(qr_id).await
    }

    pub async fn get_qr_by_id(&self, id: &str) -> Result<Option<QrCode>, LinkfolioError> {
        self.storage.find_qr_by_id(id).await
    }

    pub async fn update_qr_code_url(&self, id: &str, url: &str) -> Result<(), LinkfolioError> {
        self.storage.set_qr_code_url(id, url).await?;
        info!("QrService: custom image set for {}", id);
        Ok(())
    }

    /// Insert the scan row, then increment the counter
    ///
    /// No dedup. If the increment fails after the insert, the row stays and
    /// the error is returned.
    pub async fn record_scan(
        &self,
        qr_code_id: &str,
        meta: ScanMetadata,
    ) -> Result<QrScan, LinkfolioError> {
        let session_id = generate_session_id();
        let scan = self
            .storage
            .insert_scan(qr_code_id, &session_id, &meta)
            .await?;

        if let Err(e) = self.storage.increment_scan_count(qr_code_id).await {
            warn!(
                "QrService: scan {} stored but counter update failed: {}",
                scan.id, e
            );
            return Err(e);
        }

        Ok(scan)
    }

    /// Newest first
    pub async fn recent_scans(
        &self,
        qr_code_id: &str,
        limit: u64,
    ) -> Result<Vec<QrScan>, LinkfolioError> {
        self.storage.recent_scans(qr_code_id, limit).await
    }

    /// Lifetime counter plus today / last-7-days scan counts
    ///
    /// Boundaries come from server local time at call time.
    pub async fn get_qr_stats(&self, qr_code_id: &str) -> Result<Option<QrStats>, LinkfolioError> {
        let Some(qr) = self.storage.find_qr_by_id(qr_code_id).await? else {
            return Ok(None);
        };

        let today = start_of_today();
        let week_ago = Utc::now() - Duration::days(7);

        let scans_today = self.storage.count_scans_since(qr_code_id, today).await?;
        let scans_this_week = self.storage.count_scans_since(qr_code_id, week_ago).await?;

        Ok(Some(QrStats {
            total_scans: qr.total_scans,
            scans_today,
            scans_this_week,
            created_at: qr.created_at,
        }))
    }
}
