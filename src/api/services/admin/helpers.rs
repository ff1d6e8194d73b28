//! Response envelope and auth cookie helpers shared by every JSON API

use actix_web::HttpResponse;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::StatusCode;
use serde::Serialize;

use crate::api::constants;
use crate::config::SameSitePolicy;
use crate::errors::LinkfolioError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// `{code, message, data}` envelope with an explicit status
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

/// Envelope with `data: null`
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 5xx 记录 error 日志，4xx 不记录
pub fn error_from_linkfolio(err: &LinkfolioError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        tracing::error!("API error: {}", err);
    }
    let error_code = ErrorCode::from(err.clone());
    error_response(status, error_code, err.message())
}

/// 200 with the value, or the mapped error
pub fn api_result<T, E>(result: Result<T, E>) -> HttpResponse
where
    T: Serialize,
    E: Into<LinkfolioError>,
{
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_linkfolio(&e.into()),
    }
}

/// `Option` 结果：`None` 映射为 404
pub fn api_found<T, E>(result: Result<Option<T>, E>, what: &str) -> HttpResponse
where
    T: Serialize,
    E: Into<LinkfolioError>,
{
    api_result(result.map_err(Into::into).and_then(|found| {
        found.ok_or_else(|| LinkfolioError::not_found(format!("{} not found", what)))
    }))
}

/// 删除类操作：成功返回 `{message}`
pub fn api_deleted<E: Into<LinkfolioError>>(result: Result<(), E>, what: &str) -> HttpResponse {
    api_result(result.map(|_| super::types::MessageResponse {
        message: format!("{} deleted", what),
    }))
}

impl From<SameSitePolicy> for SameSite {
    fn from(policy: SameSitePolicy) -> Self {
        match policy {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::None => SameSite::None,
        }
    }
}

/// HttpOnly auth cookies (admin access/refresh, author access)
///
/// Attributes come from `[auth]`; an empty value with zero max-age clears
/// the cookie in the browser.
pub struct CookieBuilder {
    same_site: SameSite,
    secure: bool,
    domain: Option<String>,
    access_token_minutes: u64,
    refresh_token_days: u64,
}

impl CookieBuilder {
    pub fn from_config() -> Self {
        let auth = &crate::config::get_config().auth;
        Self {
            same_site: auth.cookie_same_site.into(),
            secure: auth.cookie_secure,
            domain: auth.cookie_domain.clone(),
            access_token_minutes: auth.access_token_minutes,
            refresh_token_days: auth.refresh_token_days,
        }
    }

    fn cookie(&self, name: &str, value: String, path: &str, max_age: Duration) -> Cookie<'static> {
        let mut builder = Cookie::build(name.to_string(), value)
            .path(path.to_string())
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(max_age);
        if let Some(domain) = &self.domain {
            builder = builder.domain(domain.clone());
        }
        builder.finish()
    }

    pub fn build_access_cookie(&self, name: &str, token: String) -> Cookie<'static> {
        let ttl = Duration::minutes(self.access_token_minutes as i64);
        self.cookie(name, token, "/", ttl)
    }

    pub fn build_refresh_cookie(&self, token: String) -> Cookie<'static> {
        let ttl = Duration::days(self.refresh_token_days as i64);
        self.cookie(
            constants::REFRESH_COOKIE_NAME,
            token,
            constants::REFRESH_COOKIE_PATH,
            ttl,
        )
    }

    pub fn build_expired_access_cookie(&self, name: &str) -> Cookie<'static> {
        self.cookie(name, String::new(), "/", Duration::ZERO)
    }

    pub fn build_expired_refresh_cookie(&self) -> Cookie<'static> {
        self.cookie(
            constants::REFRESH_COOKIE_NAME,
            String::new(),
            constants::REFRESH_COOKIE_PATH,
            Duration::ZERO,
        )
    }

    pub fn access_token_minutes(&self) -> u64 {
        self.access_token_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_response() {
        let response = created_response("post");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn test_same_site_mapping() {
        assert_eq!(SameSite::from(SameSitePolicy::None), SameSite::None);
        assert_eq!(SameSite::from(SameSitePolicy::Lax), SameSite::Lax);
    }

    #[test]
    fn test_error_from_linkfolio_maps_status() {
        let response = error_from_linkfolio(&LinkfolioError::conflict("slug taken"));
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = error_from_linkfolio(&LinkfolioError::not_found("missing"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_api_found_none_is_404() {
        let response = api_found::<String, LinkfolioError>(Ok(None), "Post");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = api_found::<String, LinkfolioError>(Ok(Some("x".to_string())), "Post");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_api_result_validation_is_400() {
        let response = api_result::<(), _>(Err(LinkfolioError::validation("bad")));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
