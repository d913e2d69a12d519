//! Collection HTTP handlers.
//!
//! ```text
//! GET    /api/collections
//! POST   /api/collections
//! GET    /api/collections/{id}
//! PATCH  /api/collections/{id}
//! DELETE /api/collections/{id}
//! POST   /api/collections/{id}/snippets
//! DELETE /api/collections/{id}/snippets/{snippet_id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{
    ApiResult, CollectionCriteria, CollectionId, CollectionUpdate, NewCollection, SnippetId,
};
use crate::inbound::http::links::{PagedResponse, page_links};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Body for adding a snippet to a collection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSnippetRequest {
    pub snippet_id: Uuid,
}

#[get("/collections")]
pub async fn list_collections(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    criteria: web::Query<CollectionCriteria>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let page = state
        .collections_query
        .list(caller, criteria.into_inner())
        .await?;
    let links = page_links(&req, &page);
    Ok(HttpResponse::Ok().json(PagedResponse { page, links }))
}

#[post("/collections")]
pub async fn create_collection(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<NewCollection>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let view = state
        .collections_command
        .create(caller, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(view))
}

#[get("/collections/{id}")]
pub async fn get_collection(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let detail = state
        .collections_query
        .get(caller, CollectionId::from(path.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(detail))
}

#[patch("/collections/{id}")]
pub async fn update_collection(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<CollectionUpdate>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let view = state
        .collections_command
        .update(
            caller,
            CollectionId::from(path.into_inner()),
            payload.into_inner(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[delete("/collections/{id}")]
pub async fn delete_collection(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    state
        .collections_command
        .delete(caller, CollectionId::from(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/collections/{id}/snippets")]
pub async fn add_snippet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<AddSnippetRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let view = state
        .collections_command
        .add_snippet(
            caller,
            CollectionId::from(path.into_inner()),
            SnippetId::from(payload.snippet_id),
        )
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[delete("/collections/{id}/snippets/{snippet_id}")]
pub async fn remove_snippet(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let caller = session.caller()?;
    let (collection, snippet) = path.into_inner();
    let view = state
        .collections_command
        .remove_snippet(
            caller,
            CollectionId::from(collection),
            SnippetId::from(snippet),
        )
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_collections)
        .service(create_collection)
        .service(get_collection)
        .service(update_collection)
        .service(delete_collection)
        .service(add_snippet)
        .service(remove_snippet);
}
