//! Linktree profile entity (the public bio-link page)

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub display_name: String,
    pub tagline: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub avatar_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub background_url: Option<String>,
    pub theme: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub resume_url: Option<String>,
    pub selected_resume_id: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub linkedin_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub instagram_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub twitter_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub github_url: Option<String>,
    pub email_url: Option<String>,
    pub showcase_title: String,
    /// JSON array of showcase items
    #[sea_orm(column_type = "Text")]
    pub showcase_items: String,
    /// JSON array of custom links
    #[sea_orm(column_type = "Text")]
    pub custom_links: String,
    #[sea_orm(unique)]
    pub short_code: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub qr_code_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
