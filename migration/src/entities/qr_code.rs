//! QR code records issued for a profile
//!
//! History is append-only: regeneration flips `is_active` and never deletes.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "qr_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Public 8-character identifier used in `/qr/{qr_id}`
    #[sea_orm(unique)]
    pub qr_id: String,
    pub profile_id: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub qr_code_url: Option<String>,
    pub qr_theme: String,
    pub is_active: bool,
    pub total_scans: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
