//! Service layer for business logic
//!
//! Services own the rules (defaults, validation, id generation) and talk to
//! [`SeaOrmStorage`](crate::storage::SeaOrmStorage); HTTP handlers and the CLI
//! only translate requests into service calls.

mod account_service;
mod analytics_service;
mod announcement_service;
pub mod geoip;
mod guestbook_service;
mod post_service;
mod profile_service;
pub mod qr_image;
mod qr_service;
mod resume_service;
mod site_settings;
mod taxonomy_service;
pub mod visitor;

pub use account_service::*;
pub use analytics_service::*;
pub use announcement_service::*;
pub use geoip::{GeoIpLookup, GeoIpProvider};
pub use guestbook_service::*;
pub use post_service::*;
pub use profile_service::*;
pub use qr_image::{QrTheme, png_data_uri, render_qr_png};
pub use qr_service::*;
pub use resume_service::*;
pub use site_settings::*;
pub use taxonomy_service::*;
pub use visitor::VisitorContext;
