pub mod admin;
pub mod announcement;
pub mod author;
pub mod category;
pub mod guestbook_entry;
pub mod page_visit;
pub mod post;
pub mod profile;
pub mod qr_code;
pub mod qr_scan;
pub mod resume;
pub mod tag;

pub use admin::Entity as AdminEntity;
pub use announcement::Entity as AnnouncementEntity;
pub use author::Entity as AuthorEntity;
pub use category::Entity as CategoryEntity;
pub use guestbook_entry::Entity as GuestbookEntryEntity;
pub use page_visit::Entity as PageVisitEntity;
pub use post::Entity as PostEntity;
pub use profile::Entity as ProfileEntity;
pub use qr_code::Entity as QrCodeEntity;
pub use qr_scan::Entity as QrScanEntity;
pub use resume::Entity as ResumeEntity;
pub use tag::Entity as TagEntity;
