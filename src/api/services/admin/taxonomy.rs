//! 分类与标签管理端点

use actix_web::{Responder, Result as ActixResult, web};

use crate::services::{CategoryInput, TagInput, TaxonomyService};

use super::helpers::{api_deleted, api_found, api_result, created_response, error_from_linkfolio};

// ============ 分类 ============

/// GET /categories（附带文章数）
pub async fn list_categories(
    taxonomy: web::Data<TaxonomyService>,
) -> ActixResult<impl Responder> {
    Ok(api_result(taxonomy.categories_with_counts().await))
}

pub async fn get_category(
    taxonomy: web::Data<TaxonomyService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_found(
        taxonomy.get_category(&path.into_inner()).await,
        "Category",
    ))
}

pub async fn create_category(
    taxonomy: web::Data<TaxonomyService>,
    body: web::Json<CategoryInput>,
) -> ActixResult<impl Responder> {
    match taxonomy.create_category(body.into_inner()).await {
        Ok(category) => Ok(created_response(category)),
        Err(e) => Ok(error_from_linkfolio(&e)),
    }
}

pub async fn update_category(
    taxonomy: web::Data<TaxonomyService>,
    path: web::Path<String>,
    body: web::Json<CategoryInput>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        taxonomy
            .update_category(&path.into_inner(), body.into_inner())
            .await,
    ))
}

pub async fn delete_category(
    taxonomy: web::Data<TaxonomyService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_deleted(
        taxonomy.delete_category(&path.into_inner()).await,
        "Category",
    ))
}

// ============ 标签 ============

/// GET /tags（附带文章数）
pub async fn list_tags(taxonomy: web::Data<TaxonomyService>) -> ActixResult<impl Responder> {
    Ok(api_result(taxonomy.tags_with_counts().await))
}

pub async fn get_tag(
    taxonomy: web::Data<TaxonomyService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_found(taxonomy.get_tag(&path.into_inner()).await, "Tag"))
}

pub async fn create_tag(
    taxonomy: web::Data<TaxonomyService>,
    body: web::Json<TagInput>,
) -> ActixResult<impl Responder> {
    match taxonomy.create_tag(body.into_inner()).await {
        Ok(tag) => Ok(created_response(tag)),
        Err(e) => Ok(error_from_linkfolio(&e)),
    }
}

pub async fn update_tag(
    taxonomy: web::Data<TaxonomyService>,
    path: web::Path<String>,
    body: web::Json<TagInput>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        taxonomy
            .update_tag(&path.into_inner(), body.into_inner())
            .await,
    ))
}

pub async fn delete_tag(
    taxonomy: web::Data<TaxonomyService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_deleted(
        taxonomy.delete_tag(&path.into_inner()).await,
        "Tag",
    ))
}
