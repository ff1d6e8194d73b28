use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 admins 表
        manager
            .create_table(
                Table::create()
                    .table(Admin::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Admin::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Admin::Username)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Admin::Password).string().not_null())
                    .col(ColumnDef::new(Admin::Email).string().null())
                    .col(
                        ColumnDef::new(Admin::Role)
                            .string_len(32)
                            .not_null()
                            .default("admin"),
                    )
                    .col(
                        ColumnDef::new(Admin::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 authors 表
        manager
            .create_table(
                Table::create()
                    .table(Author::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Author::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Author::AuthorId).string().not_null())
                    .col(
                        ColumnDef::new(Author::Username)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Author::Email).string().null())
                    .col(ColumnDef::new(Author::AuthorName).string().not_null())
                    .col(ColumnDef::new(Author::AuthorProfession).string().null())
                    .col(ColumnDef::new(Author::Description).text().null())
                    .col(ColumnDef::new(Author::Avatar).text().null())
                    .col(ColumnDef::new(Author::Linkedin).string().null())
                    .col(ColumnDef::new(Author::Github).string().null())
                    .col(ColumnDef::new(Author::Twitter).string().null())
                    .col(ColumnDef::new(Author::Website).string().null())
                    .col(ColumnDef::new(Author::Password).string().not_null())
                    .col(
                        ColumnDef::new(Author::Role)
                            .string_len(32)
                            .not_null()
                            .default("author"),
                    )
                    .col(
                        ColumnDef::new(Author::MustChangePassword)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Author::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Author::UpdatedAt)
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
            .drop_table(Table::drop().table(Author::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Admin::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Admin {
    #[sea_orm(iden = "admins")]
    Table,
    Id,
    Username,
    Password,
    Email,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Author {
    #[sea_orm(iden = "authors")]
    Table,
    Id,
    AuthorId,
    Username,
    Email,
    AuthorName,
    AuthorProfession,
    Description,
    Avatar,
    Linkedin,
    Github,
    Twitter,
    Website,
    Password,
    Role,
    MustChangePassword,
    CreatedAt,
    UpdatedAt,
}
