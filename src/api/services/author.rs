//! Author portal `/author/v1`
//!
//! Authors sign in with their own credentials and manage only the posts whose
//! `author_id` equals their account id.

use actix_web::dev::HttpServiceFactory;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder, Result as ActixResult, web};
use tracing::{error, info, warn};

use crate::api::services::admin::{
    ApiResponse, AuthSuccessResponse, CookieBuilder, ErrorCode, LoginCredentials,
    MessageResponse, PasswordChangeRequest, api_deleted, api_result, created_response,
    error_from_linkfolio, error_response,
};
use crate::api::services::admin::auth::login_rate_limiter;
use crate::api::constants;
use crate::api::jwt::{AccessClaims, Role, get_jwt_service};
use crate::api::middleware::{JwtAuth, request_claims};
use crate::errors::LinkfolioError;
use crate::services::{AccountService, CreatePostInput, PostService, UpdatePostInput};
use crate::storage::{Post, PostFilter};

fn unauthorized() -> HttpResponse {
    error_response(
        StatusCode::UNAUTHORIZED,
        ErrorCode::TokenInvalid,
        "Token is invalid",
    )
}

/// 作者只能操作自己的文章
async fn owned_post(
    posts: &PostService,
    claims: &AccessClaims,
    id: &str,
) -> Result<Post, LinkfolioError> {
    let post = posts
        .get_post_by_id(id)
        .await?
        .ok_or_else(|| LinkfolioError::not_found(format!("Post not found: {}", id)))?;
    if post.author_id != claims.sub {
        warn!(
            "Author API: '{}' tried to access post {} owned by {}",
            claims.username, id, post.author_id
        );
        return Err(LinkfolioError::forbidden("You can only manage your own posts"));
    }
    Ok(post)
}

/// POST /auth/login
pub async fn login(
    accounts: web::Data<AccountService>,
    body: web::Json<LoginCredentials>,
) -> ActixResult<impl Responder> {
    let author = match accounts
        .authenticate_author(body.username.trim(), &body.password)
        .await
    {
        Ok(Some(author)) => author,
        Ok(None) => {
            warn!("Author API: login failed for '{}'", body.username);
            return Ok(error_response(
                StatusCode::UNAUTHORIZED,
                ErrorCode::AuthFailed,
                "Invalid username or password",
            ));
        }
        Err(e) => {
            error!("Author API: login error: {}", e);
            return Ok(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Authentication error",
            ));
        }
    };

    let role = Role::from_author_role(&author.role);
    let access_token =
        match get_jwt_service().generate_access_token(&author.id, &author.username, role) {
            Ok(token) => token,
            Err(e) => {
                error!("Author API: failed to generate token: {}", e);
                return Ok(error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalServerError,
                    "Failed to generate token",
                ));
            }
        };

    info!("Author API: '{}' logged in", author.username);
    let cookie_builder = CookieBuilder::from_config();
    Ok(HttpResponse::Ok()
        .cookie(
            cookie_builder
                .build_access_cookie(constants::AUTHOR_ACCESS_COOKIE_NAME, access_token.clone()),
        )
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: ErrorCode::Success as i32,
            message: "Login successful".to_string(),
            data: Some(AuthSuccessResponse {
                message: "Login successful".to_string(),
                access_token,
                refresh_token: None,
                expires_in: cookie_builder.access_token_minutes() * 60,
                must_change_password: author.must_change_password,
            }),
        }))
}

/// POST /auth/logout
pub async fn logout() -> ActixResult<impl Responder> {
    let cookie_builder = CookieBuilder::from_config();
    Ok(HttpResponse::Ok()
        .cookie(cookie_builder.build_expired_access_cookie(constants::AUTHOR_ACCESS_COOKIE_NAME))
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: ErrorCode::Success as i32,
            message: "Logout successful".to_string(),
            data: Some(MessageResponse {
                message: "Logout successful".to_string(),
            }),
        }))
}

/// GET /me
pub async fn me(
    req: HttpRequest,
    accounts: web::Data<AccountService>,
) -> ActixResult<impl Responder> {
    let Some(claims) = request_claims(&req) else {
        return Ok(unauthorized());
    };
    let result = accounts
        .get_author(&claims.sub)
        .await
        .and_then(|found| found.ok_or_else(|| LinkfolioError::not_found("Author not found")));
    Ok(api_result(result))
}

/// PUT /password
pub async fn change_password(
    req: HttpRequest,
    accounts: web::Data<AccountService>,
    body: web::Json<PasswordChangeRequest>,
) -> ActixResult<impl Responder> {
    let Some(claims) = request_claims(&req) else {
        return Ok(unauthorized());
    };
    Ok(api_result(
        accounts
            .change_author_password(&claims.sub, &body.current_password, &body.new_password)
            .await
            .map(|_| MessageResponse {
                message: "Password changed".to_string(),
            }),
    ))
}

/// GET /posts
pub async fn list_own_posts(
    req: HttpRequest,
    posts: web::Data<PostService>,
    query: web::Query<PostFilter>,
) -> ActixResult<impl Responder> {
    let Some(claims) = request_claims(&req) else {
        return Ok(unauthorized());
    };
    let filter = AccountService::own_posts_filter(&claims.sub, query.into_inner());
    Ok(api_result(posts.list_posts(filter).await))
}

/// GET /posts/{id}
pub async fn get_own_post(
    req: HttpRequest,
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let Some(claims) = request_claims(&req) else {
        return Ok(unauthorized());
    };
    Ok(api_result(owned_post(&posts, &claims, &path.into_inner()).await))
}

/// POST /posts：作者字段强制为当前账号
pub async fn create_own_post(
    req: HttpRequest,
    posts: web::Data<PostService>,
    body: web::Json<CreatePostInput>,
) -> ActixResult<impl Responder> {
    let Some(claims) = request_claims(&req) else {
        return Ok(unauthorized());
    };
    let mut input = body.into_inner();
    input.author_id = claims.sub.clone();
    match posts.create_post(input).await {
        Ok(post) => Ok(created_response(post)),
        Err(e) => Ok(error_from_linkfolio(&e)),
    }
}

/// PUT /posts/{id}
pub async fn update_own_post(
    req: HttpRequest,
    posts: web::Data<PostService>,
    path: web::Path<String>,
    body: web::Json<UpdatePostInput>,
) -> ActixResult<impl Responder> {
    let Some(claims) = request_claims(&req) else {
        return Ok(unauthorized());
    };
    let id = path.into_inner();
    if let Err(e) = owned_post(&posts, &claims, &id).await {
        return Ok(error_from_linkfolio(&e));
    }
    let mut input = body.into_inner();
    // 不允许转移文章归属
    input.author_id = None;
    Ok(api_result(posts.update_post(&id, input).await))
}

/// DELETE /posts/{id}
pub async fn delete_own_post(
    req: HttpRequest,
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let Some(claims) = request_claims(&req) else {
        return Ok(unauthorized());
    };
    let id = path.into_inner();
    if let Err(e) = owned_post(&posts, &claims, &id).await {
        return Ok(error_from_linkfolio(&e));
    }
    Ok(api_deleted(posts.delete_post(&id).await, "Post"))
}

/// Author portal v1 路由
pub fn author_v1_routes() -> impl HttpServiceFactory {
    web::scope("/author/v1")
        .wrap(JwtAuth::author())
        .route(
            "/auth/login",
            web::post().to(login).wrap(login_rate_limiter()),
        )
        .route("/auth/logout", web::post().to(logout))
        .route("/me", web::get().to(me))
        .route("/password", web::put().to(change_password))
        .route("/posts", web::get().to(list_own_posts))
        .route("/posts", web::post().to(create_own_post))
        .route("/posts/{id}", web::get().to(get_own_post))
        .route("/posts/{id}", web::put().to(update_own_post))
        .route("/posts/{id}", web::delete().to(delete_own_post))
}
