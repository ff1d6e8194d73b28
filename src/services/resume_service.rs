//! Resume documents and PDF delivery
//!
//! A PDF lives either in the database (`pdf_data`, uploaded from the admin
//! panel) or at a remote `pdf_url` that is proxied on request.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};
use ureq::Agent;

use crate::errors::LinkfolioError;
use crate::storage::{Resume, SeaOrmStorage};

pub const DEFAULT_PDF_FILE_NAME: &str = "Resume.pdf";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";
/// Some CDNs reject non-browser agents
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FETCH_TIMEOUT_SECS: u64 = 15;
const MAX_PDF_BYTES: u64 = 20 * 1024 * 1024;

static PDF_AGENT: OnceLock<Agent> = OnceLock::new();

fn pdf_agent() -> &'static Agent {
    PDF_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(FETCH_TIMEOUT_SECS)))
            .user_agent(BROWSER_USER_AGENT)
            .build()
            .into()
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeInput {
    pub title: Option<String>,
    pub html_content: Option<String>,
    pub pdf_url: Option<String>,
    pub order: Option<i32>,
}

/// PDF bytes ready to be served
#[derive(Debug, Clone)]
pub struct PdfDocument {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

pub struct ResumeService {
    storage: Arc<SeaOrmStorage>,
}

impl ResumeService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    async fn require(&self, id: &str) -> Result<Resume, LinkfolioError> {
        self.storage
            .find_resume_by_id(id)
            .await?
            .ok_or_else(|| LinkfolioError::not_found(format!("Resume not found: {}", id)))
    }

    /// Version 1, active
    pub async fn create(&self, input: ResumeInput) -> Result<Resume, LinkfolioError> {
        let title = input
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| LinkfolioError::validation("Title is required"))?
            .to_string();

        let now = Utc::now();
        let resume = Resume {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            html_content: input.html_content.unwrap_or_default(),
            file_name: None,
            content_type: None,
            pdf_url: input.pdf_url.filter(|u| !u.is_empty()),
            pdf_data: None,
            version: 1,
            is_active: true,
            order: input.order.unwrap_or(0),
            created_at: now,
            updated_at: now,
        };
        self.storage.insert_resume(&resume).await?;
        info!("ResumeService: created '{}'", resume.title);
        Ok(resume)
    }

    /// A changed HTML body bumps the version
    pub async fn update(&self, id: &str, input: ResumeInput) -> Result<Resume, LinkfolioError> {
        let mut resume = self.require(id).await?;

        if let Some(title) = input.title.filter(|t| !t.trim().is_empty()) {
            resume.title = title.trim().to_string();
        }
        if let Some(html) = input.html_content.filter(|h| !h.is_empty())
            && html != resume.html_content
        {
            resume.html_content = html;
            resume.version += 1;
        }
        if let Some(url) = input.pdf_url {
            resume.pdf_url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(order) = input.order {
            resume.order = order;
        }

        resume.updated_at = Utc::now();
        self.storage.update_resume(&resume).await?;
        info!("ResumeService: '{}' now v{}", resume.title, resume.version);
        Ok(resume)
    }

    /// Title ascending
    pub async fn list(&self) -> Result<Vec<Resume>, LinkfolioError> {
        self.storage.list_resumes().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Resume>, LinkfolioError> {
        self.storage.find_resume_by_id(id).await
    }

    pub async fn active(&self) -> Result<Option<Resume>, LinkfolioError> {
        self.storage.find_active_resume().await
    }

    pub async fn delete(&self, id: &str) -> Result<(), LinkfolioError> {
        if !self.storage.delete_resume(id).await? {
            return Err(LinkfolioError::not_found(format!("Resume not found: {}", id)));
        }
        info!("ResumeService: deleted {}", id);
        Ok(())
    }

    /// Deactivate every other resume, then activate this one
    pub async fn set_active(&self, id: &str) -> Result<Resume, LinkfolioError> {
        let mut resume = self.require(id).await?;
        self.storage.deactivate_other_resumes(id).await?;
        resume.is_active = true;
        resume.updated_at = Utc::now();
        self.storage.update_resume(&resume).await?;
        Ok(resume)
    }

    pub async fn upload_pdf(
        &self,
        id: &str,
        bytes: Vec<u8>,
        file_name: Option<String>,
        content_type: Option<String>,
    ) -> Result<Resume, LinkfolioError> {
        if bytes.is_empty() {
            return Err(LinkfolioError::validation("Uploaded file is empty"));
        }
        let mut resume = self.require(id).await?;
        let size = bytes.len();
        resume.pdf_data = Some(bytes);
        resume.file_name = file_name.filter(|n| !n.is_empty());
        resume.content_type = Some(
            content_type
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| PDF_CONTENT_TYPE.to_string()),
        );
        resume.updated_at = Utc::now();
        self.storage.update_resume(&resume).await?;
        info!("ResumeService: stored {} byte PDF for '{}'", size, resume.title);
        Ok(resume)
    }

    /// Stored bytes first, then the remote URL
    ///
    /// `NotFound` when neither exists, `Upstream` when the fetch fails.
    pub async fn pdf(&self, id: &str) -> Result<PdfDocument, LinkfolioError> {
        let resume = self.require(id).await?;
        let file_name = resume
            .file_name
            .clone()
            .unwrap_or_else(|| DEFAULT_PDF_FILE_NAME.to_string());

        if let Some(bytes) = resume.pdf_data.filter(|d| !d.is_empty()) {
            return Ok(PdfDocument {
                bytes,
                content_type: resume
                    .content_type
                    .unwrap_or_else(|| PDF_CONTENT_TYPE.to_string()),
                file_name,
            });
        }

        let url = resume
            .pdf_url
            .ok_or_else(|| LinkfolioError::not_found("Resume content missing"))?;

        let (bytes, content_type) = tokio::task::spawn_blocking(move || fetch_remote_pdf(&url))
            .await
            .map_err(|e| LinkfolioError::upstream(format!("PDF fetch task failed: {}", e)))??;

        Ok(PdfDocument {
            bytes,
            content_type,
            file_name,
        })
    }
}

fn fetch_remote_pdf(url: &str) -> Result<(Vec<u8>, String), LinkfolioError> {
    let resp = pdf_agent().get(url).call().map_err(|e| {
        warn!("Resume PDF fetch from {} failed: {}", url, e);
        LinkfolioError::upstream(format!("Upstream fetch failed: {}", e))
    })?;

    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or(PDF_CONTENT_TYPE)
        .to_string();

    let bytes = resp
        .into_body()
        .with_config()
        .limit(MAX_PDF_BYTES)
        .read_to_vec()
        .map_err(|e| LinkfolioError::upstream(format!("Upstream body read failed: {}", e)))?;

    Ok((bytes, content_type))
}
