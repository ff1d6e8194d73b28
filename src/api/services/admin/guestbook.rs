//! 留言板审核端点

use actix_web::{Responder, Result as ActixResult, web};
use serde::Deserialize;

use crate::services::{GuestbookFilter, GuestbookService};

use super::helpers::{api_deleted, api_result};
use super::types::MessageResponse;

#[derive(Debug, Deserialize, Default)]
pub struct GuestbookQuery {
    #[serde(default)]
    pub filter: GuestbookFilter,
}

/// GET /guestbook?filter=pending|approved
pub async fn list_entries(
    guestbook: web::Data<GuestbookService>,
    query: web::Query<GuestbookQuery>,
) -> ActixResult<impl Responder> {
    Ok(api_result(guestbook.list_entries(query.filter).await))
}

/// POST /guestbook/{id}/approve
pub async fn approve_entry(
    guestbook: web::Data<GuestbookService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_result(guestbook.approve(&path.into_inner()).await.map(
        |_| MessageResponse {
            message: "Entry approved".to_string(),
        },
    )))
}

/// DELETE /guestbook/{id}
pub async fn delete_entry(
    guestbook: web::Data<GuestbookService>,
    path: web::Path<String>,
) -> ActixResult<impl Responder> {
    Ok(api_deleted(
        guestbook.delete(&path.into_inner()).await,
        "Entry",
    ))
}
