//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;

/// Build a session middleware configured for tests.
///
/// Generates a fresh signing key per invocation, names the cookie
/// `session`, and disables the `Secure` flag for plain-HTTP test calls.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Establish a session for `id` through [`test_login_route`] and return
/// the resulting cookie.
pub async fn login<S, B>(app: &S, id: UserId) -> actix_web::cookie::Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let res = actix_web::test::call_service(
        app,
        actix_web::test::TestRequest::post()
            .uri(&format!("/test-login/{id}"))
            .to_request(),
    )
    .await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Route that logs in an arbitrary user id, standing in for the external
/// authentication flow.
pub fn test_login_route() -> actix_web::Resource {
    web::resource("/test-login/{id}").route(web::post().to(
        |session: SessionContext, path: web::Path<Uuid>| async move {
            session.persist_user(&UserId::from(path.into_inner()))?;
            Ok::<_, Error>(HttpResponse::NoContent().finish())
        },
    ))
}
