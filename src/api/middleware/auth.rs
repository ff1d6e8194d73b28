//! Access-token guard
//!
//! Claims of an accepted token are stored in the request extensions for
//! handlers to read back with [`request_claims`].

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info, trace};

use crate::api::constants;
use crate::api::jwt::{AccessClaims, Role, get_jwt_service};
use crate::api::services::admin::{ApiResponse, ErrorCode};

/// Which portal a middleware instance guards
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthScope {
    /// `/admin/v1`, role `admin`
    Admin,
    /// `/author/v1`, role `author` or `superadmin`
    Author,
}

impl AuthScope {
    fn cookie_name(self) -> &'static str {
        match self {
            AuthScope::Admin => constants::ACCESS_COOKIE_NAME,
            AuthScope::Author => constants::AUTHOR_ACCESS_COOKIE_NAME,
        }
    }

    fn allows(self, role: Role) -> bool {
        match self {
            AuthScope::Admin => role == Role::Admin,
            AuthScope::Author => role.is_author(),
        }
    }

    /// Endpoints reachable without an access token
    fn is_public_path(self, path: &str) -> bool {
        match self {
            AuthScope::Admin => matches!(
                path,
                "/admin/v1/auth/login" | "/admin/v1/auth/refresh" | "/admin/v1/auth/logout"
            ),
            AuthScope::Author => {
                matches!(path, "/author/v1/auth/login" | "/author/v1/auth/logout")
            }
        }
    }
}

/// Claims of the authenticated caller, set by [`JwtAuth`]
pub fn request_claims(req: &HttpRequest) -> Option<AccessClaims> {
    req.extensions().get::<AccessClaims>().cloned()
}

/// Access-token guard for the admin and author scopes
#[derive(Clone)]
pub struct JwtAuth {
    scope: AuthScope,
}

impl JwtAuth {
    pub fn admin() -> Self {
        Self {
            scope: AuthScope::Admin,
        }
    }

    pub fn author() -> Self {
        Self {
            scope: AuthScope::Author,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            scope: self.scope,
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    scope: AuthScope,
}

/// Bearer header first, then the scope's cookie
fn authenticate(req: &ServiceRequest, scope: AuthScope) -> Option<AccessClaims> {
    let bearer = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_owned);

    bearer
        .into_iter()
        .chain(req.cookie(scope.cookie_name()).map(|c| c.value().to_owned()))
        .find_map(|token| check_token(&token, scope))
}

fn check_token(token: &str, scope: AuthScope) -> Option<AccessClaims> {
    let claims = get_jwt_service()
        .validate_access_token(token)
        .map_err(|e| debug!("Rejected access token: {}", e))
        .ok()?;

    if !scope.allows(claims.role) {
        info!("{:?} token presented to {:?} scope", claims.role, scope);
        return None;
    }
    Some(claims)
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .json(ApiResponse::<()> {
            code: ErrorCode::Unauthorized as i32,
            message: "Unauthorized: Invalid or missing token".to_string(),
            data: None,
        })
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let scope = self.scope;

        Box::pin(async move {
            // CORS 预检直接放行
            if req.method() == Method::OPTIONS {
                let preflight = HttpResponse::NoContent()
                    .insert_header((CONTENT_TYPE, "text/plain; charset=utf-8"))
                    .finish();
                return Ok(req.into_response(preflight).map_into_right_body());
            }

            if scope.is_public_path(req.path()) {
                trace!("{} is public", req.path());
                return srv.call(req).await.map(ServiceResponse::map_into_left_body);
            }

            let Some(claims) = authenticate(&req, scope) else {
                info!("Unauthenticated request to {}", req.path());
                return Ok(req.into_response(unauthorized()).map_into_right_body());
            };

            trace!("Authenticated '{}' ({:?})", claims.username, claims.role);
            req.extensions_mut().insert(claims);
            srv.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_roles() {
        assert!(AuthScope::Admin.allows(Role::Admin));
        assert!(!AuthScope::Admin.allows(Role::Superadmin));
        assert!(AuthScope::Author.allows(Role::Author));
        assert!(AuthScope::Author.allows(Role::Superadmin));
        assert!(!AuthScope::Author.allows(Role::Admin));
    }

    #[test]
    fn test_public_paths() {
        assert!(AuthScope::Admin.is_public_path("/admin/v1/auth/login"));
        assert!(AuthScope::Admin.is_public_path("/admin/v1/auth/refresh"));
        assert!(!AuthScope::Admin.is_public_path("/admin/v1/auth/verify"));
        assert!(AuthScope::Author.is_public_path("/author/v1/auth/login"));
        assert!(AuthScope::Author.is_public_path("/author/v1/auth/logout"));
        assert!(!AuthScope::Author.is_public_path("/author/v1/me"));
    }
}
