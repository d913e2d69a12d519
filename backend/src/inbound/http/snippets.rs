//! Snippet HTTP handlers.
//!
//! ```text
//! GET    /api/snippets
//! POST   /api/snippets
//! GET    /api/snippets/{id}
//! PATCH  /api/snippets/{id}
//! DELETE /api/snippets/{id}
//! POST   /api/snippets/{id}/like
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use pagination::PageLinks;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{ApiResult, NewSnippet, SnippetCriteria, SnippetId, SnippetPage, SnippetUpdate};
use crate::inbound::http::links::cursor_links;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Cursor-paged listing body.
#[derive(Debug, Serialize)]
struct SnippetListResponse {
    #[serde(flatten)]
    page: SnippetPage,
    links: PageLinks,
}

#[get("/snippets")]
pub async fn list_snippets(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    criteria: web::Query<SnippetCriteria>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let page = state
        .snippets_query
        .list(caller, criteria.into_inner())
        .await?;
    let links = cursor_links(
        &req,
        page.next_cursor.as_deref(),
        page.previous_cursor.as_deref(),
    );
    Ok(HttpResponse::Ok().json(SnippetListResponse { page, links }))
}

#[post("/snippets")]
pub async fn create_snippet(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NewSnippet>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let view = state
        .snippets_command
        .create(caller, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(view))
}

#[get("/snippets/{id}")]
pub async fn get_snippet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let view = state
        .snippets_query
        .get(caller, SnippetId::from(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[patch("/snippets/{id}")]
pub async fn update_snippet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<SnippetUpdate>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let view = state
        .snippets_command
        .update(caller, SnippetId::from(path.into_inner()), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[delete("/snippets/{id}")]
pub async fn delete_snippet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    state
        .snippets_command
        .delete(caller, SnippetId::from(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Flip the caller's like on a snippet.
#[post("/snippets/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let toggle = state
        .snippets_command
        .toggle_like(caller, SnippetId::from(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(toggle))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_snippets)
        .service(create_snippet)
        .service(get_snippet)
        .service(update_snippet)
        .service(delete_snippet)
        .service(toggle_like);
}
