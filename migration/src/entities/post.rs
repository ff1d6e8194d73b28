use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text")]
    pub summary: String,
    pub author_id: String,
    /// JSON array of category ids
    #[sea_orm(column_type = "Text")]
    pub category_ids: String,
    /// JSON array of tag ids
    #[sea_orm(column_type = "Text")]
    pub tag_ids: String,
    pub post_type: String,
    #[sea_orm(column_type = "Text")]
    pub cover_image: String,
    /// JSON array of image urls
    #[sea_orm(column_type = "Text")]
    pub gallery: String,
    pub status: String,
    pub pricing: String,
    pub price: Option<i64>,
    pub access_level: String,
    pub featured: bool,
    pub minute_read: i32,
    pub views: i64,
    pub likes: i64,
    pub date: DateTimeUtc,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
