use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 guestbook_entries 表
        manager
            .create_table(
                Table::create()
                    .table(GuestbookEntry::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GuestbookEntry::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GuestbookEntry::Author).string().not_null())
                    .col(ColumnDef::new(GuestbookEntry::Content).text().not_null())
                    .col(
                        ColumnDef::new(GuestbookEntry::Approved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GuestbookEntry::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 page_visits 表
        manager
            .create_table(
                Table::create()
                    .table(PageVisit::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PageVisit::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PageVisit::Path).string_len(512).not_null())
                    .col(ColumnDef::new(PageVisit::Referrer).text().null())
                    .col(ColumnDef::new(PageVisit::UserAgent).text().null())
                    .col(ColumnDef::new(PageVisit::IpHash).string_len(64).null())
                    .col(ColumnDef::new(PageVisit::Country).string_len(8).null())
                    .col(ColumnDef::new(PageVisit::Device).string_len(32).null())
                    .col(ColumnDef::new(PageVisit::Browser).string_len(32).null())
                    .col(ColumnDef::new(PageVisit::Os).string_len(32).null())
                    .col(
                        ColumnDef::new(PageVisit::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_page_visits_created_at")
                    .table(PageVisit::Table)
                    .col(PageVisit::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // 创建 announcements 表
        manager
            .create_table(
                Table::create()
                    .table(Announcement::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Announcement::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Announcement::Title).string().not_null())
                    .col(ColumnDef::new(Announcement::Description).text().null())
                    .col(ColumnDef::new(Announcement::BackgroundUrl).text().null())
                    .col(ColumnDef::new(Announcement::LinkUrl).text().null())
                    .col(ColumnDef::new(Announcement::LinkText).string().null())
                    .col(
                        ColumnDef::new(Announcement::Order)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Announcement::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Announcement::Slot)
                            .string_len(32)
                            .not_null()
                            .default("events"),
                    )
                    .col(
                        ColumnDef::new(Announcement::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Announcement::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 resumes 表
        manager
            .create_table(
                Table::create()
                    .table(Resume::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Resume::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Resume::Title).string().not_null())
                    .col(ColumnDef::new(Resume::HtmlContent).text().not_null())
                    .col(ColumnDef::new(Resume::FileName).string().null())
                    .col(ColumnDef::new(Resume::ContentType).string().null())
                    .col(ColumnDef::new(Resume::PdfUrl).text().null())
                    .col(ColumnDef::new(Resume::PdfData).blob().null())
                    .col(
                        ColumnDef::new(Resume::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Resume::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Resume::Order)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Resume::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Resume::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Resume::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Announcement::Table).to_owned())
            .await?;

        manager
            .drop_index(Index::drop().name("idx_page_visits_created_at").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PageVisit::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(GuestbookEntry::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GuestbookEntry {
    #[sea_orm(iden = "guestbook_entries")]
    Table,
    Id,
    Author,
    Content,
    Approved,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PageVisit {
    #[sea_orm(iden = "page_visits")]
    Table,
    Id,
    Path,
    Referrer,
    UserAgent,
    IpHash,
    Country,
    Device,
    Browser,
    Os,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Announcement {
    #[sea_orm(iden = "announcements")]
    Table,
    Id,
    Title,
    Description,
    BackgroundUrl,
    LinkUrl,
    LinkText,
    Order,
    IsActive,
    Slot,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Resume {
    #[sea_orm(iden = "resumes")]
    Table,
    Id,
    Title,
    HtmlContent,
    FileName,
    ContentType,
    PdfUrl,
    PdfData,
    Version,
    IsActive,
    Order,
    CreatedAt,
    UpdatedAt,
}
