pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260301_000001_profile_and_qr;
mod m20260301_000002_blog_content;
mod m20260301_000003_accounts;
mod m20260302_000001_site_content;
mod m20260305_000001_scan_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_profile_and_qr::Migration),
            Box::new(m20260301_000002_blog_content::Migration),
            Box::new(m20260301_000003_accounts::Migration),
            Box::new(m20260302_000001_site_content::Migration),
            Box::new(m20260305_000001_scan_indexes::Migration),
        ]
    }
}
