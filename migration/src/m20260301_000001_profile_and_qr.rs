use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 profiles 表
        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profile::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profile::DisplayName).string().not_null())
                    .col(ColumnDef::new(Profile::Tagline).string().null())
                    .col(ColumnDef::new(Profile::AvatarUrl).text().null())
                    .col(ColumnDef::new(Profile::BackgroundUrl).text().null())
                    .col(
                        ColumnDef::new(Profile::Theme)
                            .string()
                            .not_null()
                            .default("dark"),
                    )
                    .col(ColumnDef::new(Profile::ResumeUrl).text().null())
                    .col(ColumnDef::new(Profile::SelectedResumeId).string().null())
                    .col(ColumnDef::new(Profile::LinkedinUrl).text().null())
                    .col(ColumnDef::new(Profile::InstagramUrl).text().null())
                    .col(ColumnDef::new(Profile::TwitterUrl).text().null())
                    .col(ColumnDef::new(Profile::GithubUrl).text().null())
                    .col(ColumnDef::new(Profile::EmailUrl).string().null())
                    .col(
                        ColumnDef::new(Profile::ShowcaseTitle)
                            .string()
                            .not_null()
                            .default("My Current Work"),
                    )
                    .col(ColumnDef::new(Profile::ShowcaseItems).text().not_null())
                    .col(ColumnDef::new(Profile::CustomLinks).text().not_null())
                    .col(
                        ColumnDef::new(Profile::ShortCode)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Profile::QrCodeUrl).text().null())
                    .col(
                        ColumnDef::new(Profile::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Profile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profile::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 qr_codes 表
        manager
            .create_table(
                Table::create()
                    .table(QrCode::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QrCode::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QrCode::QrId)
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(QrCode::ProfileId).string().not_null())
                    .col(ColumnDef::new(QrCode::QrCodeUrl).text().null())
                    .col(
                        ColumnDef::new(QrCode::QrTheme)
                            .string()
                            .not_null()
                            .default("light"),
                    )
                    .col(
                        ColumnDef::new(QrCode::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(QrCode::TotalScans)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(QrCode::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QrCode::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 qr_scans 表
        manager
            .create_table(
                Table::create()
                    .table(QrScan::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QrScan::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(QrScan::QrCodeId).string().not_null())
                    .col(ColumnDef::new(QrScan::SessionId).string_len(32).not_null())
                    .col(ColumnDef::new(QrScan::IpHash).string_len(64).not_null())
                    .col(ColumnDef::new(QrScan::UserAgent).text().not_null())
                    .col(ColumnDef::new(QrScan::Device).string_len(32).not_null())
                    .col(ColumnDef::new(QrScan::Browser).string_len(32).not_null())
                    .col(ColumnDef::new(QrScan::Os).string_len(32).not_null())
                    .col(ColumnDef::new(QrScan::Country).string_len(8).null())
                    .col(ColumnDef::new(QrScan::Referrer).text().null())
                    .col(
                        ColumnDef::new(QrScan::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // profile_id + is_active 查询当前有效二维码
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_qr_codes_profile_active")
                    .table(QrCode::Table)
                    .col(QrCode::ProfileId)
                    .col(QrCode::IsActive)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_qr_codes_profile_active").to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(QrScan::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(QrCode::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Profile::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Profile {
    #[sea_orm(iden = "profiles")]
    Table,
    Id,
    DisplayName,
    Tagline,
    AvatarUrl,
    BackgroundUrl,
    Theme,
    ResumeUrl,
    SelectedResumeId,
    LinkedinUrl,
    InstagramUrl,
    TwitterUrl,
    GithubUrl,
    EmailUrl,
    ShowcaseTitle,
    ShowcaseItems,
    CustomLinks,
    ShortCode,
    QrCodeUrl,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QrCode {
    #[sea_orm(iden = "qr_codes")]
    Table,
    Id,
    QrId,
    ProfileId,
    QrCodeUrl,
    QrTheme,
    IsActive,
    TotalScans,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum QrScan {
    #[sea_orm(iden = "qr_scans")]
    Table,
    Id,
    QrCodeId,
    SessionId,
    IpHash,
    UserAgent,
    Device,
    Browser,
    Os,
    Country,
    Referrer,
    CreatedAt,
}
