//! 文章管理端点

use actix_web::{Responder, Result as ActixResult, web};
use serde::Deserialize;
use tracing::info;

use crate::services::{CreatePostInput, PostService, UpdatePostInput};
use crate::storage::PostFilter;

use super::helpers::{api_deleted, api_found, api_result, created_response, error_from_linkfolio};

#[derive(Debug, Deserialize, Default)]
pub struct LimitQuery {
    pub limit: Option<u64>,
}

/// GET /posts
pub async fn list_posts(
    posts: web::Data<PostService>,
    query: web::Query<PostFilter>,
) -> ActixResult<impl Responder> {
    Ok(api_result(posts.list_posts(query.into_inner()).await))
}

/// GET /posts/stats
pub async fn post_stats(posts: web::Data<PostService>) -> ActixResult<impl Responder> {
    Ok(api_result(posts.post_stats().await))
}

/// GET /posts/featured
pub async fn featured_posts(
    posts: web::Data<PostService>,
    query: web::Query<LimitQuery>,
) -> ActixResult<impl Responder> {
    Ok(api_result(posts.featured_posts(query.limit).await))
}

/// GET /posts/popular
pub async fn popular_posts(
    posts: web::Data<PostService>,
    query: web::Query<LimitQuery>,
) -> ActixResult<impl Responder> {
    Ok(api_result(posts.popular_posts(query.limit).await))
}

/// GET /posts/{id}
pub async fn get_post(
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_found(posts.get_post_by_id(&path.into_inner()).await, "Post"))
}

/// POST /posts
pub async fn create_post(
    posts: web::Data<PostService>,
    body: web::Json<CreatePostInput>,
) -> ActixResult<impl Responder> {
    info!("Admin API: create post '{}'", body.title);
    match posts.create_post(body.into_inner()).await {
        Ok(post) => Ok(created_response(post)),
        Err(e) => Ok(error_from_linkfolio(&e)),
    }
}

/// PUT /posts/{id}
pub async fn update_post(
    posts: web::Data<PostService>,
    path: web::Path<String>,
    body: web::Json<UpdatePostInput>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        posts.update_post(&path.into_inner(), body.into_inner()).await,
    ))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_deleted(posts.delete_post(&path.into_inner()).await, "Post"))
}

/// POST /posts/{id}/publish
pub async fn publish_post(
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_result(posts.publish_post(&path.into_inner()).await))
}

/// POST /posts/{id}/unpublish
pub async fn unpublish_post(
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_result(posts.unpublish_post(&path.into_inner()).await))
}

/// POST /posts/{id}/archive
pub async fn archive_post(
    posts: web::Data<PostService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_result(posts.archive_post(&path.into_inner()).await))
}
