use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "resumes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub html_content: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub pdf_url: Option<String>,
    #[sea_orm(column_type = "Blob", nullable)]
    pub pdf_data: Option<Vec<u8>>,
    pub version: i32,
    pub is_active: bool,
    pub order: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
