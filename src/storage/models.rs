use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 个人主页展示项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowcaseItem {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// 自定义链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomLink {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub display_name: String,
    pub tagline: Option<String>,
    pub avatar_url: Option<String>,
    pub background_url: Option<String>,
    pub theme: String,
    pub resume_url: Option<String>,
    pub selected_resume_id: Option<String>,
    pub linkedin_url: Option<String>,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
    pub github_url: Option<String>,
    pub email_url: Option<String>,
    pub showcase_title: String,
    pub showcase_items: Vec<ShowcaseItem>,
    pub custom_links: Vec<CustomLink>,
    pub short_code: String,
    pub qr_code_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrCode {
    pub id: String,
    pub qr_id: String,
    pub profile_id: String,
    pub qr_code_url: Option<String>,
    pub qr_theme: String,
    pub is_active: bool,
    pub total_scans: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrScan {
    pub id: i64,
    pub qr_code_id: String,
    pub session_id: String,
    pub ip_hash: String,
    pub user_agent: String,
    pub device: String,
    pub browser: String,
    pub os: String,
    pub country: Option<String>,
    pub referrer: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 单次扫码采集到的访客信息（入库前）
#[derive(Debug, Clone, Default)]
pub struct ScanMetadata {
    pub ip_hash: String,
    pub user_agent: String,
    pub device: String,
    pub browser: String,
    pub os: String,
    pub country: Option<String>,
    pub referrer: Option<String>,
}

/// 活跃二维码及最近扫码记录
#[derive(Debug, Clone, Serialize)]
pub struct QrWithScans {
    #[serde(flatten)]
    pub qr: QrCode,
    pub scans: Vec<QrScan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QrStats {
    pub total_scans: i64,
    pub scans_today: u64,
    pub scans_this_week: u64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub summary: String,
    pub author_id: String,
    pub category_ids: Vec<String>,
    pub tag_ids: Vec<String>,
    pub post_type: String,
    pub cover_image: String,
    pub gallery: Vec<String>,
    pub status: String,
    pub pricing: String,
    pub price: Option<i64>,
    pub access_level: String,
    pub featured: bool,
    pub minute_read: i32,
    pub views: i64,
    pub likes: i64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 文章过滤条件
#[derive(Default, Clone, Debug, Deserialize)]
pub struct PostFilter {
    /// 状态（大小写不敏感）
    pub status: Option<String>,
    pub author_id: Option<String>,
    pub category_id: Option<String>,
    pub tag_id: Option<String>,
    /// 模糊匹配标题或摘要
    pub search: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: u64,
    pub page: u64,
    pub total_pages: u64,
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostStats {
    pub total: u64,
    pub published: u64,
    pub drafts: u64,
    pub archived: u64,
    pub total_views: i64,
    pub total_likes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub cat_id: String,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub tag_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WithPostCount<T> {
    #[serde(flatten)]
    pub item: T,
    pub post_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub author_id: String,
    pub username: String,
    pub email: Option<String>,
    pub author_name: String,
    pub author_profession: Option<String>,
    pub description: Option<String>,
    pub avatar: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
    /// argon2 哈希，不对外输出
    #[serde(skip_serializing, default)]
    pub password: String,
    pub role: String,
    pub must_change_password: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthorStats {
    pub total_posts: u64,
    pub published_posts: u64,
    pub draft_posts: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password: String,
    pub email: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestbookEntry {
    pub id: String,
    pub author: String,
    pub content: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageVisit {
    pub id: i64,
    pub path: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip_hash: Option<String>,
    pub country: Option<String>,
    pub device: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 待写入的页面访问
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPageVisit {
    pub path: String,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip_hash: Option<String>,
    pub country: Option<String>,
    pub device: Option<String>,
    pub browser: Option<String>,
    pub os: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageCount {
    pub path: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub total_views: u64,
    pub unique_visitors: u64,
    pub top_pages: Vec<PageCount>,
    pub recent_visits: Vec<PageVisit>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub background_url: Option<String>,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
    pub order: i32,
    pub is_active: bool,
    pub slot: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub id: String,
    pub title: String,
    pub html_content: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub pdf_url: Option<String>,
    /// PDF 二进制只通过 /resume/{id}/pdf 输出
    #[serde(skip)]
    pub pdf_data: Option<Vec<u8>>,
    pub version: i32,
    pub is_active: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resume {
    pub fn has_pdf(&self) -> bool {
        self.pdf_data.as_ref().is_some_and(|d| !d.is_empty()) || self.pdf_url.is_some()
    }
}
