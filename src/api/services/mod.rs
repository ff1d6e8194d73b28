pub mod admin;
pub mod author;
pub mod health;
pub mod public;
pub mod redirect;
pub mod uploads;

use actix_web::web;

pub use admin::admin_v1_routes;
pub use author::author_v1_routes;
pub use health::{HealthService, health_routes};
pub use public::{public_api_routes, resume_routes};
pub use redirect::{RedirectService, redirect_routes};
pub use uploads::upload_routes;

/// 挂载全部路由
///
/// 服务本身由 [`AppServices::register`](crate::api::app_state::AppServices::register)
/// 注入，这里只负责路由。
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let config = crate::config::get_config();

    cfg.service(admin_v1_routes())
        .service(author_v1_routes())
        .service(public_api_routes())
        .service(resume_routes())
        .service(health_routes())
        .service(upload_routes(&config.site.upload_url_prefix));
    redirect_routes(cfg);
}
