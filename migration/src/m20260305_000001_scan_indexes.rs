//! 扫码统计查询索引
//!
//! get_qr_stats 按 qr_code_id + created_at 做范围计数，
//! recent_scans 按 created_at 倒序取前 N 条。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_qr_scans_code_created")
                    .table(QrScan::Table)
                    .col(QrScan::QrCodeId)
                    .col(QrScan::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_qr_scans_code_created").to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum QrScan {
    #[sea_orm(iden = "qr_scans")]
    Table,
    QrCodeId,
    CreatedAt,
}
