//! Scan event entity, one row per recorded QR visit

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "qr_scans")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// References qr_codes.id
    pub qr_code_id: String,
    pub session_id: String,
    pub ip_hash: String,
    #[sea_orm(column_type = "Text")]
    pub user_agent: String,
    pub device: String,
    pub browser: String,
    pub os: String,
    pub country: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub referrer: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
