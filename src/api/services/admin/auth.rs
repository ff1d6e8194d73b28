//! Admin login, token refresh and account self-service

use actix_governor::{Governor, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError};
use actix_web::dev::ServiceRequest;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use governor::middleware::NoOpMiddleware;
use tracing::{debug, error, info, warn};

use crate::api::constants;
use crate::api::jwt::{Role, get_jwt_service};
use crate::api::middleware::auth::request_claims;
use crate::config::get_config;
use crate::services::{AccountService, AdminUpdate};
use crate::utils::ip::rate_limit_ip;

use super::error_code::ErrorCode;
use super::helpers::{
    CookieBuilder, api_result, error_response, json_response, success_response,
};
use super::types::{AuthSuccessResponse, LoginCredentials, MessageResponse, VerifyResponse};

/// Limiter key: socket peer, or the forwarded client behind a trusted proxy
#[derive(Clone, Copy)]
pub struct LoginKeyExtractor;

impl KeyExtractor for LoginKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        let peer_ip = req
            .peer_addr()
            .map(|addr| addr.ip().to_string())
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract peer IP"))?;

        let trusted = &get_config().server.trusted_proxies;
        let key = rate_limit_ip(&peer_ip, req.headers(), trusted);
        debug!("Login rate limit key: {}", key);
        Ok(key)
    }
}

type IpLimiter = Governor<LoginKeyExtractor, NoOpMiddleware>;

/// 每秒补充 1 个令牌，超出 `burst` 返回 429
fn ip_limiter(burst: u32) -> IpLimiter {
    let config = GovernorConfigBuilder::default()
        .seconds_per_request(1)
        .burst_size(burst)
        .key_extractor(LoginKeyExtractor)
        .finish()
        .unwrap_or_else(|| unreachable!("burst and period are non-zero"));
    Governor::new(&config)
}

/// Login endpoints of both portals: burst of 5
pub fn login_rate_limiter() -> IpLimiter {
    ip_limiter(5)
}

pub fn refresh_rate_limiter() -> IpLimiter {
    ip_limiter(20)
}

fn token_pair(sub: &str, username: &str) -> Result<(String, String), jsonwebtoken::errors::Error> {
    let jwt = get_jwt_service();
    Ok((
        jwt.generate_access_token(sub, username, Role::Admin)?,
        jwt.generate_refresh_token(sub, username, Role::Admin)?,
    ))
}

/// Sets both HttpOnly cookies and echoes the tokens in the body
fn issue_admin_tokens(sub: &str, username: &str, message: &str) -> HttpResponse {
    let (access_token, refresh_token) = match token_pair(sub, username) {
        Ok(pair) => pair,
        Err(e) => {
            error!("Admin API: token signing failed: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Failed to generate token",
            );
        }
    };

    let cookies = CookieBuilder::from_config();
    let body = AuthSuccessResponse {
        message: message.to_string(),
        access_token: access_token.clone(),
        refresh_token: Some(refresh_token.clone()),
        expires_in: cookies.access_token_minutes() * 60,
        must_change_password: false,
    };

    let mut response = json_response(StatusCode::OK, ErrorCode::Success, message, Some(body));
    for cookie in [
        cookies.build_access_cookie(constants::ACCESS_COOKIE_NAME, access_token),
        cookies.build_refresh_cookie(refresh_token),
    ] {
        if let Err(e) = response.add_cookie(&cookie) {
            error!("Admin API: failed to set cookie: {}", e);
        }
    }
    response
}

/// 登录：用户名 + 密码
pub async fn login(
    accounts: web::Data<AccountService>,
    body: web::Json<LoginCredentials>,
) -> ActixResult<impl Responder> {
    let admin = match accounts
        .authenticate_admin(body.username.trim(), &body.password)
        .await
    {
        Ok(Some(admin)) => admin,
        Ok(None) => {
            warn!("Admin API: login failed for '{}'", body.username);
            return Ok(error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::AuthFailed,
                "Invalid username or password",
            ));
        }
        Err(e) => {
            error!("Admin API: login error: {}", e);
            return Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Authentication error",
            ));
        }
    };

    info!("Admin API: '{}' logged in", admin.username);
    Ok(issue_admin_tokens(&admin.id, &admin.username, "Login successful"))
}

/// Sliding renewal from the refresh cookie
pub async fn refresh_token(req: HttpRequest) -> ActixResult<impl Responder> {
    let Some(cookie) = req.cookie(constants::REFRESH_COOKIE_NAME) else {
        warn!("Admin API: refresh token not found in cookie");
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::TokenInvalid,
            "Refresh token not found",
        ));
    };

    let claims = get_jwt_service()
        .validate_refresh_token(cookie.value())
        .ok()
        .filter(|claims| claims.role == Role::Admin);
    let Some(claims) = claims else {
        warn!("Admin API: rejected refresh token");
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::TokenInvalid,
            "Invalid refresh token",
        ));
    };

    Ok(issue_admin_tokens(
        &claims.sub,
        &claims.username,
        "Token refreshed",
    ))
}

/// 清除两个 cookie；不要求已登录
pub async fn logout() -> ActixResult<impl Responder> {
    info!("Admin API: logout");

    let cookies = CookieBuilder::from_config();
    let message = "Logout successful";
    let mut response = json_response(
        StatusCode::OK,
        ErrorCode::Success,
        message,
        Some(MessageResponse {
            message: message.to_string(),
        }),
    );
    response.add_cookie(&cookies.build_expired_access_cookie(constants::ACCESS_COOKIE_NAME))?;
    response.add_cookie(&cookies.build_expired_refresh_cookie())?;
    Ok(response)
}

/// 验证 token - 中间件已放行即有效
pub async fn verify_token(req: HttpRequest) -> ActixResult<impl Responder> {
    let Some(claims) = request_claims(&req) else {
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::TokenInvalid,
            "Token is invalid",
        ));
    };
    Ok(success_response(VerifyResponse {
        message: "Token is valid".to_string(),
        username: claims.username,
        role: "admin".to_string(),
    }))
}

/// 修改当前管理员的用户名/邮箱/密码
pub async fn update_me(
    req: HttpRequest,
    accounts: web::Data<AccountService>,
    body: web::Json<AdminUpdate>,
) -> ActixResult<impl Responder> {
    let Some(claims) = request_claims(&req) else {
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::TokenInvalid,
            "Token is invalid",
        ));
    };
    Ok(api_result(
        accounts.update_admin(&claims.sub, body.into_inner()).await,
    ))
}
