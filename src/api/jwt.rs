//! Token issuance for the admin and author portals
//!
//! Both token kinds share one claim set; `kind` keeps a refresh token from
//! being accepted where an access token is expected and the other way round.

use std::sync::OnceLock;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

static JWT_SERVICE: OnceLock<JwtService> = OnceLock::new();

/// Process-wide service built from `[auth]` on first use
pub fn get_jwt_service() -> &'static JwtService {
    JWT_SERVICE.get_or_init(JwtService::from_config)
}

/// Who a token was issued to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Author,
    Superadmin,
}

impl Role {
    /// Author portal access
    pub fn is_author(self) -> bool {
        matches!(self, Role::Author | Role::Superadmin)
    }

    /// Author-table role string (`author` / `superadmin`)
    pub fn from_author_role(role: &str) -> Self {
        if role == "superadmin" {
            Role::Superadmin
        } else {
            Role::Author
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account row id (admins or authors table)
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

pub type AccessClaims = Claims;
pub type RefreshClaims = Claims;

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtService {
    pub fn new(secret: &str, access_token_minutes: u64, refresh_token_days: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::minutes(access_token_minutes as i64),
            refresh_ttl: Duration::days(refresh_token_days as i64),
        }
    }

    pub fn from_config() -> Self {
        let auth = &crate::config::get_config().auth;

        // 未配置密钥时生成随机值，重启后旧 token 全部失效
        let secret = if auth.jwt_secret.is_empty() {
            tracing::warn!("auth.jwt_secret is empty; tokens will not survive a restart");
            crate::utils::generate_random_code(48)
        } else {
            auth.jwt_secret.clone()
        };

        Self::new(&secret, auth.access_token_minutes, auth.refresh_token_days)
    }

    fn issue(&self, sub: &str, username: &str, role: Role, kind: TokenKind) -> Result<String, JwtError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            username: username.to_string(),
            role,
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
    }

    fn check(&self, token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::default())?.claims;
        if claims.kind != expected {
            return Err(JwtError::from(ErrorKind::InvalidToken));
        }
        Ok(claims)
    }

    pub fn generate_access_token(&self, sub: &str, username: &str, role: Role) -> Result<String, JwtError> {
        self.issue(sub, username, role, TokenKind::Access)
    }

    pub fn generate_refresh_token(&self, sub: &str, username: &str, role: Role) -> Result<String, JwtError> {
        self.issue(sub, username, role, TokenKind::Refresh)
    }

    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        self.check(token, TokenKind::Access)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, JwtError> {
        self.check(token, TokenKind::Refresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "linkfolio-test-secret-0123456789";

    fn service() -> JwtService {
        JwtService::new(SECRET, 15, 7)
    }

    #[test]
    fn test_admin_access_token() {
        let token = service()
            .generate_access_token("admin-1", "admin", Role::Admin)
            .unwrap();
        let claims = service().validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, "admin-1");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.kind, TokenKind::Access);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_superadmin_author_token() {
        let token = service()
            .generate_access_token("a-1", "jane", Role::from_author_role("superadmin"))
            .unwrap();
        let claims = service().validate_access_token(&token).unwrap();
        assert_eq!(claims.role, Role::Superadmin);
        assert!(claims.role.is_author());
        assert!(!Role::Admin.is_author());
        assert_eq!(Role::from_author_role("author"), Role::Author);
    }

    #[test]
    fn test_token_kinds_not_interchangeable() {
        let svc = service();
        let access = svc.generate_access_token("admin-1", "admin", Role::Admin).unwrap();
        let refresh = svc.generate_refresh_token("admin-1", "admin", Role::Admin).unwrap();

        assert!(svc.validate_refresh_token(&access).is_err());
        assert!(svc.validate_access_token(&refresh).is_err());
        assert!(svc.validate_refresh_token(&refresh).is_ok());
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let token = service()
            .generate_access_token("admin-1", "admin", Role::Admin)
            .unwrap();
        let other = JwtService::new("another-secret-entirely-000000", 15, 7);
        assert!(other.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let svc = JwtService::new(SECRET, 0, 7);
        let now = Utc::now();
        let claims = Claims {
            sub: "admin-1".to_string(),
            username: "admin".to_string(),
            role: Role::Admin,
            kind: TokenKind::Access,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            jti: "expired".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(svc.validate_access_token(&token).is_err());
    }
}
