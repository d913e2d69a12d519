//! User profile HTTP handlers.
//!
//! ```text
//! GET    /api/users
//! GET    /api/users/{id}
//! PATCH  /api/users/{id}
//! DELETE /api/users/{id}
//! GET    /api/users/{id}/snippets
//! ```
//!
//! Registration and login live in an external identity flow; these
//! endpoints only read and maintain existing profiles.

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, web};
use uuid::Uuid;

use crate::domain::{ApiResult, UserCriteria, UserId, UserProfileUpdate};
use crate::inbound::http::links::{PagedResponse, page_links};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[get("/users")]
pub async fn list_users(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    criteria: web::Query<UserCriteria>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let page = state.users_query.list(caller, criteria.into_inner()).await?;
    let links = page_links(&req, &page);
    Ok(HttpResponse::Ok().json(PagedResponse { page, links }))
}

#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let summary = state
        .users_query
        .get(caller, UserId::from(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[patch("/users/{id}")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UserProfileUpdate>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let summary = state
        .users_command
        .update_profile(caller, UserId::from(path.into_inner()), payload.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// Delete the caller's own account; the session is cleared afterwards.
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    state
        .users_command
        .delete(caller, UserId::from(path.into_inner()))
        .await?;
    session.clear();
    Ok(HttpResponse::NoContent().finish())
}

#[get("/users/{id}/snippets")]
pub async fn user_snippets(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let views = state
        .users_query
        .snippets_of(caller, UserId::from(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(views))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_users)
        .service(get_user)
        .service(update_profile)
        .service(delete_user)
        .service(user_snippets);
}
