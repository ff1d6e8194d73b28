//! 作者账号管理端点

use actix_web::{Responder, Result as ActixResult, web};
use serde::Deserialize;
use tracing::info;

use crate::services::{AccountService, CreateAuthorInput, UpdateAuthorInput};

use super::helpers::{api_deleted, api_found, api_result, created_response, error_from_linkfolio};
use super::types::{MessageResponse, TemporaryPasswordResponse};

#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub password: String,
    #[serde(default)]
    pub must_change_password: bool,
}

/// GET /authors
pub async fn list_authors(accounts: web::Data<AccountService>) -> ActixResult<impl Responder> {
    Ok(api_result(accounts.list_authors().await))
}

/// GET /authors/{id}
pub async fn get_author(
    accounts: web::Data<AccountService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_found(accounts.get_author(&path.into_inner()).await, "Author"))
}

/// GET /authors/{id}/stats
pub async fn get_author_stats(
    accounts: web::Data<AccountService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_result(accounts.author_stats(&path.into_inner()).await))
}

/// POST /authors：临时密码只在此返回一次
pub async fn create_author(
    accounts: web::Data<AccountService>,
    body: web::Json<CreateAuthorInput>,
) -> ActixResult<impl Responder> {
    match accounts.create_author(body.into_inner()).await {
        Ok(created) => Ok(created_response(TemporaryPasswordResponse {
            item: created.author,
            temporary_password: created.temporary_password,
        })),
        Err(e) => Ok(error_from_linkfolio(&e)),
    }
}

/// PUT /authors/{id}
pub async fn update_author(
    accounts: web::Data<AccountService>,
    path: web::Path<String>,
    body: web::Json<UpdateAuthorInput>,
) -> ActixResult<impl Responder> {
    Ok(api_result(
        accounts
            .update_author(&path.into_inner(), body.into_inner())
            .await,
    ))
}

/// PUT /authors/{id}/password
pub async fn set_author_password(
    accounts: web::Data<AccountService>,
    path: web::Path<String>,
    body: web::Json<SetPasswordRequest>,
) -> ActixResult<impl Responder> {
    let body = body.into_inner();
    Ok(api_result(
        accounts
            .update_author_password(&path.into_inner(), &body.password, body.must_change_password)
            .await
            .map(|_| MessageResponse {
                message: "Password updated".to_string(),
            }),
    ))
}

/// POST /authors/{id}/reset-password
pub async fn reset_author_password(
    accounts: web::Data<AccountService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    let id = path.into_inner();
    info!("Admin API: reset password for author {}", id);
    Ok(api_result(accounts.reset_author_password(&id).await.map(
        |temporary_password| TemporaryPasswordResponse {
            item: MessageResponse {
                message: "Password reset".to_string(),
            },
            temporary_password,
        },
    )))
}

/// DELETE /authors/{id}
pub async fn delete_author(
    accounts: web::Data<AccountService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_deleted(
        accounts.delete_author(&path.into_inner()).await,
        "Author",
    ))
}
